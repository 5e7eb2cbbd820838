mod common;

use common::{engine, global};
use luma::{context::LoopState, error::EngineError, platform::PlatformEvent};

#[test]
fn argument_errors_can_be_caught()
{
        let (mut engine, probe) = engine();

        probe.push_batch(vec![PlatformEvent::Quit]);

        engine.run_source(
                "main.lua",
                r#"
                Luma.Start()
                ok, message = pcall(Luma.Drawing.SetColor, 5)
                size_ok, size_message = pcall(Luma.Window.SetSize, "wide", 10)
                key_ok, key_message = pcall(Luma.Input.IsKeyDown)
                message, size_message, key_message = tostring(message), tostring(size_message), tostring(key_message)
                "#,
        )
        .unwrap();

        assert!(!global::<bool>(&engine, "ok"));
        assert!(
                global::<String>(&engine, "message")
                        .contains("bad argument #1 to 'Drawing.SetColor' (Color expected, got number)")
        );
        assert!(!global::<bool>(&engine, "size_ok"));
        assert!(
                global::<String>(&engine, "size_message")
                        .contains("bad argument #1 to 'Window.SetSize' (number expected, got string)")
        );
        assert!(
                global::<String>(&engine, "key_message")
                        .contains("bad argument #1 to 'Input.IsKeyDown' (string expected, got no value)")
        );
}

#[test]
fn argument_errors_are_checked_before_start()
{
        let (mut engine, _) = engine();

        engine.run_source(
                "main.lua",
                r#"ok, message = pcall(Luma.Drawing.FillRect, 1, {}) message = tostring(message)"#,
        )
        .unwrap();

        assert!(!global::<bool>(&engine, "ok"));
        assert!(global::<String>(&engine, "message").contains("got table"));
}

#[test]
fn handle_of_the_wrong_kind_is_named_in_the_error()
{
        let (mut engine, _) = engine();

        engine.run_source(
                "main.lua",
                r#"ok, message = pcall(Luma.Drawing.DrawImage, Luma.Color.new(), 0, 0) message = tostring(message)"#,
        )
        .unwrap();

        assert!(
                global::<String>(&engine, "message")
                        .contains("bad argument #1 to 'Drawing.DrawImage' (Image expected, got Color)")
        );
}

#[test]
fn missing_image_is_fatal_even_under_pcall()
{
        let (mut engine, _) = engine();

        let err = engine
                .run_source(
                        "main.lua",
                        r#"
                        pcall(Luma.Image.new, "does/not/exist.png")
                        reached = true
                        "#,
                )
                .unwrap_err();

        assert!(matches!(err, EngineError::Decode { kind: "Image", .. }));
        assert!(err.to_string().starts_with("Can't create Image from 'does/not/exist.png'"));
}

#[test]
fn missing_sound_is_fatal()
{
        let (mut engine, _) = engine();

        let err = engine.run_source("main.lua", r#"Luma.Sound.new("nope.wav")"#).unwrap_err();

        assert!(matches!(err, EngineError::Decode { kind: "Sound", .. }));
}

#[test]
fn fatal_error_in_render_stops_the_loop()
{
        let (mut engine, probe) = engine();

        probe.push_batch(vec![]);
        probe.push_batch(vec![]);

        let err = engine
                .run_source(
                        "main.lua",
                        r#"
                        function render() Luma.Image.new("missing.png") end
                        Luma.Start()
                        "#,
                )
                .unwrap_err();

        assert!(matches!(err, EngineError::Decode { .. }));
        assert_eq!(engine.frames(), 0);
        assert_eq!(probe.frames_presented(), 0);
}

#[test]
fn window_failure_is_fatal()
{
        let (mut engine, probe) = engine();

        probe.fail_open("no display");

        let err = engine.run_source("main.lua", "Luma.Start()").unwrap_err();

        assert!(matches!(
                err,
                EngineError::SubsystemInit {
                        subsystem: "window",
                        ..
                }
        ));
        assert_eq!(engine.state(), LoopState::NotStarted);
}

#[test]
fn top_level_errors_abort_the_run()
{
        let (mut engine, _) = engine();

        let syntax = engine.run_source("main.lua", "this is not lua").unwrap_err();

        assert!(matches!(syntax, EngineError::Script(_)));

        let runtime = engine.run_source("main.lua", r#"error("nope")"#).unwrap_err();

        assert!(runtime.to_string().contains("nope"));
}

#[test]
fn missing_entry_file_is_a_script_error()
{
        let (mut engine, _) = engine();

        let err = engine
                .run_file(std::path::Path::new("definitely/missing/main.lua"))
                .unwrap_err();

        assert!(matches!(err, EngineError::Script(_)));
}

#[test]
fn run_file_executes_the_entry_script()
{
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("main.lua");

        std::fs::write(&entry, "from_file = 42").unwrap();

        let (mut engine, _) = engine();

        engine.run_file(&entry).unwrap();

        assert_eq!(global::<i64>(&engine, "from_file"), 42);
}
