use std::{
        cell::RefCell,
        collections::VecDeque,
        rc::Rc,
};

use crate::{
        platform::{Platform, PlatformEvent, WindowSettings},
        renderer::canvas::Canvas,
};

#[derive(Debug, Default)]
struct HeadlessState
{
        open: bool,
        settings: Option<WindowSettings>,
        size: (u32, u32),
        position: (i32, i32),
        /// One batch per `poll_events` call.
        batches: VecDeque<Vec<PlatformEvent>>,
        polls: usize,
        presented: usize,
        last_frame: Option<Canvas>,
        fail_open: Option<String>,
        closed: bool,
}

/// Window-less backend.
///
/// Every call to [`Platform::poll_events`] hands out the next queued batch of
/// events (or nothing). Frames handed to [`Platform::present`] are counted
/// and the last one is kept for inspection through [`HeadlessProbe`].
#[derive(Debug)]
pub struct HeadlessPlatform
{
        state: Rc<RefCell<HeadlessState>>,
}

/// Shared view into a [`HeadlessPlatform`] after it has been handed to the
/// engine.
#[derive(Debug, Clone)]
pub struct HeadlessProbe
{
        state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessPlatform
{
        pub fn new() -> (Self, HeadlessProbe)
        {
                let state = Rc::new(RefCell::new(HeadlessState::default()));

                (
                        Self {
                                state: state.clone(),
                        },
                        HeadlessProbe {
                                state,
                        },
                )
        }
}

impl HeadlessProbe
{
        /// Queues the batch returned by a future poll, in order.
        pub fn push_batch(
                &self,
                events: Vec<PlatformEvent>,
        )
        {
                self.state.borrow_mut().batches.push_back(events);
        }

        /// Makes the next `open` fail, simulating a native init failure.
        pub fn fail_open(
                &self,
                message: &str,
        )
        {
                self.state.borrow_mut().fail_open = Some(message.to_string());
        }

        pub fn is_open(&self) -> bool
        {
                self.state.borrow().open
        }

        pub fn is_closed(&self) -> bool
        {
                self.state.borrow().closed
        }

        pub fn settings(&self) -> Option<WindowSettings>
        {
                self.state.borrow().settings.clone()
        }

        pub fn polls(&self) -> usize
        {
                self.state.borrow().polls
        }

        pub fn frames_presented(&self) -> usize
        {
                self.state.borrow().presented
        }

        pub fn last_frame(&self) -> Option<Canvas>
        {
                self.state.borrow().last_frame.clone()
        }
}

impl Platform for HeadlessPlatform
{
        fn name(&self) -> &'static str
        {
                "headless"
        }

        fn open(
                &mut self,
                settings: &WindowSettings,
        ) -> anyhow::Result<()>
        {
                let mut state = self.state.borrow_mut();

                if let Some(message) = state.fail_open.take()
                {
                        anyhow::bail!(message);
                }

                state.open = true;
                state.size = (settings.width, settings.height);
                state.position = (settings.x.unwrap_or(0), settings.y.unwrap_or(0));
                state.settings = Some(settings.clone());

                Ok(())
        }

        fn is_open(&self) -> bool
        {
                self.state.borrow().open
        }

        fn window_size(&self) -> (u32, u32)
        {
                self.state.borrow().size
        }

        fn set_window_size(
                &mut self,
                width: u32,
                height: u32,
        )
        {
                self.state.borrow_mut().size = (width, height);
        }

        fn window_position(&self) -> (i32, i32)
        {
                self.state.borrow().position
        }

        fn set_window_position(
                &mut self,
                x: i32,
                y: i32,
        )
        {
                self.state.borrow_mut().position = (x, y);
        }

        fn poll_events(&mut self) -> Vec<PlatformEvent>
        {
                let mut state = self.state.borrow_mut();

                state.polls += 1;

                let events = state.batches.pop_front().unwrap_or_default();

                for event in &events
                {
                        match *event
                        {
                                PlatformEvent::Resized {
                                        width,
                                        height,
                                } => state.size = (width, height),
                                PlatformEvent::Moved {
                                        x,
                                        y,
                                } => state.position = (x, y),
                                _ =>
                                {}
                        }
                }

                events
        }

        fn present(
                &mut self,
                canvas: &Canvas,
        ) -> anyhow::Result<()>
        {
                let mut state = self.state.borrow_mut();

                state.presented += 1;
                state.last_frame = Some(canvas.clone());

                Ok(())
        }

        fn close(&mut self)
        {
                let mut state = self.state.borrow_mut();

                if state.open
                {
                        log::debug!("Headless window closed.");
                }

                state.open = false;
                state.closed = true;
        }
}

#[cfg(test)]
mod tests
{
        use super::*;

        fn settings() -> WindowSettings
        {
                WindowSettings {
                        title: String::from("test"),
                        width: 64,
                        height: 32,
                        x: Some(5),
                        y: Some(6),
                }
        }

        #[test]
        fn batches_are_handed_out_in_order()
        {
                let (mut platform, probe) = HeadlessPlatform::new();

                probe.push_batch(vec![PlatformEvent::FocusLost]);
                probe.push_batch(vec![PlatformEvent::Quit]);

                assert_eq!(platform.poll_events(), vec![PlatformEvent::FocusLost]);
                assert_eq!(platform.poll_events(), vec![PlatformEvent::Quit]);
                assert!(platform.poll_events().is_empty());
                assert_eq!(probe.polls(), 3);
        }

        #[test]
        fn open_records_geometry()
        {
                let (mut platform, probe) = HeadlessPlatform::new();

                platform.open(&settings()).unwrap();

                assert!(probe.is_open());
                assert_eq!(platform.window_size(), (64, 32));
                assert_eq!(platform.window_position(), (5, 6));
        }

        #[test]
        fn scripted_failure_surfaces_from_open()
        {
                let (mut platform, probe) = HeadlessPlatform::new();

                probe.fail_open("no display");

                let err = platform.open(&settings()).unwrap_err();

                assert_eq!(err.to_string(), "no display");
                assert!(!platform.is_open());
        }

        #[test]
        fn resize_events_update_reported_size()
        {
                let (mut platform, probe) = HeadlessPlatform::new();

                platform.open(&settings()).unwrap();
                probe.push_batch(vec![PlatformEvent::Resized {
                        width: 10,
                        height: 11,
                }]);
                platform.poll_events();

                assert_eq!(platform.window_size(), (10, 11));
        }
}
