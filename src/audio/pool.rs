/// Fixed set of mixer channels, each either free or owned by one sound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPool
{
        in_use: Vec<bool>,
}

impl ChannelPool
{
        pub fn new(capacity: usize) -> Self
        {
                Self {
                        in_use: vec![false; capacity],
                }
        }

        pub fn capacity(&self) -> usize
        {
                self.in_use.len()
        }

        /// Claims the lowest free channel.
        pub fn reserve(&mut self) -> Option<usize>
        {
                let index = self.in_use.iter().position(|used| !used)?;

                self.in_use[index] = true;

                Some(index)
        }

        /// Frees `index`. Releasing a free or out of range channel does
        /// nothing.
        pub fn release(
                &mut self,
                index: usize,
        )
        {
                if let Some(slot) = self.in_use.get_mut(index)
                {
                        *slot = false;
                }
        }

        pub fn is_reserved(
                &self,
                index: usize,
        ) -> bool
        {
                self.in_use.get(index).copied().unwrap_or(false)
        }

        pub fn reserved(&self) -> usize
        {
                self.in_use.iter().filter(|used| **used).count()
        }

        pub fn release_all(&mut self)
        {
                self.in_use.fill(false);
        }
}

#[cfg(test)]
mod tests
{
        use super::*;

        #[test]
        fn reserve_hands_out_lowest_free_slot()
        {
                let mut pool = ChannelPool::new(3);

                assert_eq!(pool.reserve(), Some(0));
                assert_eq!(pool.reserve(), Some(1));

                pool.release(0);

                assert_eq!(pool.reserve(), Some(0));
                assert_eq!(pool.reserve(), Some(2));
        }

        #[test]
        fn exhausted_pool_refuses()
        {
                let mut pool = ChannelPool::new(2);

                pool.reserve();
                pool.reserve();

                assert_eq!(pool.reserve(), None);
                assert_eq!(pool.reserved(), 2);
        }

        #[test]
        fn release_is_idempotent()
        {
                let mut pool = ChannelPool::new(2);

                let a = pool.reserve().unwrap();
                let b = pool.reserve().unwrap();

                pool.release(a);
                pool.release(a);
                pool.release(99);

                assert!(!pool.is_reserved(a));
                assert!(pool.is_reserved(b));
                assert_eq!(pool.reserve(), Some(a));
                assert_eq!(pool.reserve(), None);
        }
}
