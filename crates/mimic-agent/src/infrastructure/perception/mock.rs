//! Scripted perception gate for unit testing and dry runs.
//!
//! Locate results are served from a queue; once the queue is empty every
//! call returns the fallback result.  Focus and cursor position are plain
//! settable values.
//!
//! The agent binary uses [`ScriptedPerceptionGate::finds_everywhere`] as its
//! dry-run gate.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use mimic_core::Region;

use crate::application::automation::{PerceptionError, PerceptionGate};

type LocateResult = Result<Option<Region>, String>;

/// Answer given once the queue is empty.
#[derive(Debug, Clone, Copy)]
enum Fallback {
    Fixed(Option<Region>),
    SearchRegion,
}

/// A perception gate whose answers are set up ahead of time.
#[derive(Debug)]
pub struct ScriptedPerceptionGate {
    queued: Mutex<VecDeque<LocateResult>>,
    fallback: Fallback,
    focused: AtomicBool,
    cursor: Mutex<(i32, i32)>,
    locate_calls: AtomicUsize,
    templates: Mutex<Vec<String>>,
}

impl ScriptedPerceptionGate {
    fn with_fallback(fallback: Fallback) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback,
            focused: AtomicBool::new(true),
            cursor: Mutex::new((0, 0)),
            locate_calls: AtomicUsize::new(0),
            templates: Mutex::new(Vec::new()),
        }
    }

    /// A gate that finds every template at `region` once the queue drains.
    pub fn always_found(region: Region) -> Self {
        Self::with_fallback(Fallback::Fixed(Some(region)))
    }

    /// A gate that never finds anything once the queue drains.
    pub fn never_found() -> Self {
        Self::with_fallback(Fallback::Fixed(None))
    }

    /// A gate that reports every template as filling its search region.
    pub fn finds_everywhere() -> Self {
        Self::with_fallback(Fallback::SearchRegion)
    }

    /// Queues the result of the next unanswered `locate` call.
    pub fn push_locate(&self, result: Option<Region>) {
        if let Ok(mut queued) = self.queued.lock() {
            queued.push_back(Ok(result));
        }
    }

    /// Queues a capture failure for the next unanswered `locate` call.
    pub fn push_error(&self, message: &str) {
        if let Ok(mut queued) = self.queued.lock() {
            queued.push_back(Err(message.to_string()));
        }
    }

    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::SeqCst);
    }

    pub fn set_cursor(&self, x: i32, y: i32) {
        if let Ok(mut cursor) = self.cursor.lock() {
            *cursor = (x, y);
        }
    }

    /// Total number of `locate` calls so far.
    pub fn locate_calls(&self) -> usize {
        self.locate_calls.load(Ordering::SeqCst)
    }

    /// Templates passed to `locate`, in call order.
    pub fn located_templates(&self) -> Vec<String> {
        self.templates.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl PerceptionGate for ScriptedPerceptionGate {
    fn locate(
        &self,
        template: &str,
        search_region: &Region,
        _confidence: f64,
    ) -> Result<Option<Region>, PerceptionError> {
        self.locate_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut templates) = self.templates.lock() {
            templates.push(template.to_string());
        }
        let next = self
            .queued
            .lock()
            .map_err(|_| PerceptionError::Capture("locate queue poisoned".into()))?
            .pop_front();
        match next {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(PerceptionError::Capture(message)),
            None => match self.fallback {
                Fallback::Fixed(result) => Ok(result),
                Fallback::SearchRegion => Ok(Some(*search_region)),
            },
        }
    }

    fn is_foreground_focused(&self, _process_label: &str) -> bool {
        self.focused.load(Ordering::SeqCst)
    }

    fn cursor_position(&self) -> (i32, i32) {
        self.cursor.lock().map(|c| *c).unwrap_or((0, 0))
    }
}
