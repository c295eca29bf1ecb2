//! An in-memory terminal backend for tests.
use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{
    backend::Backend, buf::CellBuf, error::Result, event::key::Key, geom::Expanse,
    testing::buf::BufTest,
};

/// Everything a [`TestBackend`] has observed, shared with the test.
#[derive(Debug, Default)]
pub struct TestScreen {
    /// Surface size reported to the runtime.
    pub size: Expanse,
    /// Every frame flushed, oldest first.
    pub frames: Vec<CellBuf>,
    /// Keys returned by successive polls, one per poll.
    pub keys: VecDeque<Key>,
    /// A pending resize to report.
    pub resize: Option<Expanse>,
    /// Number of start calls.
    pub starts: usize,
    /// Number of stop calls.
    pub stops: usize,
}

impl TestScreen {
    /// The most recently flushed frame.
    pub fn last_frame(&self) -> Option<&CellBuf> {
        self.frames.last()
    }

    /// Does the last frame contain the given text?
    pub fn contains_text(&self, txt: &str) -> bool {
        self.last_frame()
            .is_some_and(|f| BufTest::new(f).contains_text(txt))
    }

    /// Queue keys for the input task.
    pub fn push_keys(&mut self, keys: impl IntoIterator<Item = impl Into<Key>>) {
        self.keys.extend(keys.into_iter().map(Into::into));
    }

    /// Simulate a terminal resize.
    pub fn resize(&mut self, size: Expanse) {
        self.size = size;
        self.resize = Some(size);
    }
}

/// A backend that records frames in memory and replays scripted keys.
pub struct TestBackend {
    /// Shared state.
    screen: Rc<RefCell<TestScreen>>,
}

impl TestBackend {
    /// Create a backend with the given surface size, returning the shared
    /// screen state alongside it.
    pub fn create(size: Expanse) -> (Rc<RefCell<TestScreen>>, Self) {
        let screen = Rc::new(RefCell::new(TestScreen {
            size,
            ..TestScreen::default()
        }));
        (screen.clone(), Self { screen })
    }
}

impl Backend for TestBackend {
    fn start(&mut self) -> Result<()> {
        self.screen.borrow_mut().starts += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.screen.borrow_mut().stops += 1;
        Ok(())
    }

    fn surface_size(&self) -> Result<Expanse> {
        Ok(self.screen.borrow().size)
    }

    fn flush(&mut self, frame: &CellBuf) -> Result<()> {
        self.screen.borrow_mut().frames.push(frame.clone());
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<Key>> {
        Ok(self.screen.borrow_mut().keys.pop_front())
    }

    fn take_resize(&mut self) -> Option<Expanse> {
        self.screen.borrow_mut().resize.take()
    }
}
