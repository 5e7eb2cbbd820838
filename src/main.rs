fn main()
{
        if let Err(err) = luma::run_luma()
        {
                log::error!("{err:#}");

                std::process::exit(1);
        }
}
