//! Deterministic platform fakes for controller tests

use crate::platform::{PersistedConfig, PlatformAdapter, TimerId};
use crate::state::{BorderStyle, OverlayWindowState, TransparencyKey};
use crate::{OverlayError, OverlayResult};
use capture::{CaptureError, CaptureResult, CaptureSource, PixelBuffer, Point, Rect, Size};
use std::cell::Cell;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Side effects recorded in call order
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SetTopmost(bool),
    Activate,
    SetTransparencyKey(TransparencyKey),
    SetBorderStyle(BorderStyle),
    SetLocation(Point),
    StateChanged,
    Invalidate,
    StartTimer(TimerId),
    StopTimer(TimerId),
    Confirm,
    Clipboard,
}

pub struct FakePlatform {
    pub state: OverlayWindowState,
    pub work_area: Rect,
    pub frame_border: Size,
    pub cursor: Point,
    pub confirm_answer: bool,
    pub clipboard: Option<PixelBuffer>,
    pub fail_clipboard: bool,
    pub running_timers: HashSet<TimerId>,
    pub events: Vec<Event>,
    epoch: Instant,
    elapsed: Duration,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            state: OverlayWindowState {
                bounds: Rect::new(100, 100, 400, 300),
                topmost: false,
                ..Default::default()
            },
            work_area: Rect::new(0, 0, 1920, 1040),
            frame_border: Size::new(8, 8),
            cursor: Point::new(-500, -500),
            confirm_answer: false,
            clipboard: None,
            fail_clipboard: false,
            running_timers: HashSet::new(),
            events: Vec::new(),
            epoch: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// Move the manual clock forward
    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    pub fn timer_running(&self, id: TimerId) -> bool {
        self.running_timers.contains(&id)
    }
}

impl PlatformAdapter for FakePlatform {
    fn opacity(&self) -> f64 {
        self.state.opacity
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.state.opacity = opacity;
    }

    fn set_transparency_key(&mut self, key: TransparencyKey) {
        self.state.transparency_key = key;
        self.events.push(Event::SetTransparencyKey(key));
    }

    fn border_style(&self) -> BorderStyle {
        self.state.border_style
    }

    fn set_border_style(&mut self, style: BorderStyle) {
        self.state.border_style = style;
        self.events.push(Event::SetBorderStyle(style));
    }

    fn bounds(&self) -> Rect {
        self.state.bounds
    }

    fn set_location(&mut self, location: Point) {
        self.state.bounds.x = location.x;
        self.state.bounds.y = location.y;
        self.events.push(Event::SetLocation(location));
    }

    fn set_topmost(&mut self, topmost: bool) {
        self.state.topmost = topmost;
        self.events.push(Event::SetTopmost(topmost));
    }

    fn activate(&mut self) {
        self.events.push(Event::Activate);
    }

    fn invalidate(&mut self) {
        self.events.push(Event::Invalidate);
    }

    fn work_area(&self) -> Rect {
        self.work_area
    }

    fn frame_border_thickness(&self) -> Size {
        self.frame_border
    }

    fn cursor_position(&self) -> Point {
        self.cursor
    }

    fn notify_window_state_changed(&mut self) {
        self.events.push(Event::StateChanged);
    }

    fn set_clipboard_image(&mut self, image: &PixelBuffer) -> OverlayResult<()> {
        self.events.push(Event::Clipboard);
        if self.fail_clipboard {
            return Err(OverlayError::Export(export::ExportError::ClipboardUnavailable(
                "locked by another process".into(),
            )));
        }

        // Same encoding step as the real clipboard writer
        export::encode_dib(image)?;
        self.clipboard = Some(image.clone());
        Ok(())
    }

    fn start_timer(&mut self, id: TimerId, _period: Duration) {
        self.running_timers.insert(id);
        self.events.push(Event::StartTimer(id));
    }

    fn stop_timer(&mut self, id: TimerId) {
        self.running_timers.remove(&id);
        self.events.push(Event::StopTimer(id));
    }

    fn now(&self) -> Instant {
        self.epoch + self.elapsed
    }

    fn confirm(&mut self, _title: &str, _message: &str) -> bool {
        self.events.push(Event::Confirm);
        self.confirm_answer
    }
}

pub struct FakeSettings {
    pub first_time_click_forwarding: bool,
}

impl PersistedConfig for FakeSettings {
    fn first_time_click_forwarding(&self) -> bool {
        self.first_time_click_forwarding
    }

    fn clear_first_time_click_forwarding(&mut self) {
        self.first_time_click_forwarding = false;
    }
}

/// Target window with a fixed rectangle; pixels encode their coordinates
pub struct FakeTarget {
    pub rect: CaptureResult<Rect>,
    pub render_ok: bool,
    pub renders: Cell<usize>,
}

impl FakeTarget {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: Ok(rect),
            render_ok: true,
            renders: Cell::new(0),
        }
    }

    pub fn gone() -> Self {
        Self {
            rect: Err(CaptureError::TargetGone),
            render_ok: false,
            renders: Cell::new(0),
        }
    }
}

impl CaptureSource for FakeTarget {
    fn screen_rect(&self) -> CaptureResult<Rect> {
        match &self.rect {
            Ok(rect) => Ok(*rect),
            Err(_) => Err(CaptureError::TargetGone),
        }
    }

    fn render_full_content(&self, buffer: &mut PixelBuffer) -> CaptureResult<()> {
        self.renders.set(self.renders.get() + 1);
        if !self.render_ok {
            return Err(CaptureError::RenderFailed);
        }

        let width = buffer.width as usize;
        for (i, px) in buffer.data.chunks_exact_mut(4).enumerate() {
            px[0] = (i % width) as u8;
            px[1] = (i / width) as u8;
            px[3] = 0xFF;
        }
        Ok(())
    }
}
