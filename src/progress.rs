use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "{spinner:.blue} {msg} [{elapsed}]";
const SPINNER_FRAMES: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Feedback hooks driven by the scan orchestrator.
///
/// `start` is called before the discovery operation launches, `tick` once per
/// poll while waiting, and `finish` exactly once when the scan ends for any
/// reason. Implementations must not panic.
pub trait ProgressReporter: Send {
    fn start(&mut self, message: &str);
    fn tick(&mut self);
    fn finish(&mut self);
}

/// Reporter that draws nothing. Used for rescans, where the TUI owns the screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ProgressReporter for Silent {
    fn start(&mut self, _message: &str) {}
    fn tick(&mut self) {}
    fn finish(&mut self) {}
}

/// Animated terminal spinner shown while the initial scan runs
#[derive(Debug, Default)]
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    pub fn new() -> Self {
        Self { bar: None }
    }
}

impl ProgressReporter for Spinner {
    fn start(&mut self, message: &str) {
        log::debug!("[progress] spinner_start: message={}", message);
        let bar = ProgressBar::new_spinner();
        match ProgressStyle::with_template(SPINNER_TEMPLATE) {
            Ok(style) => bar.set_style(style.tick_strings(SPINNER_FRAMES)),
            Err(e) => log::warn!("[progress] spinner_style_invalid: error={}", e),
        }
        bar.set_message(message.to_string());
        self.bar = Some(bar);
    }

    fn tick(&mut self) {
        if let Some(bar) = &self.bar {
            bar.tick();
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
            log::debug!("[progress] spinner_finish");
        }
    }
}
