use std::cell::Cell;

use log::LevelFilter;

pub use crate::traits::Progress;

enum Bar {
    Hidden,
    Interactive(indicatif::ProgressBar),
    Log(logbar::ProgressBar),
}

/// Progress over a loop of known length
///
/// In an interactive terminal this is an `indicatif` bar, otherwise a
/// `logbar` bar. While a bar is shown logging is switched off and it
/// is restored when the bar finishes or is dropped. Nothing is shown if
/// the log level is not `info`.
pub struct ProgressBar {
    bar: Bar,
    suspended_level: Cell<Option<LevelFilter>>,
}

impl ProgressBar {
    pub fn new(len: u64, message: &str) -> Self {
        let level = log::max_level();
        if level != LevelFilter::Info {
            return Self::hidden();
        }
        let bar = if console::Term::stderr().features().is_attended() {
            Self::interactive(len, message)
        } else {
            eprintln!("{message}");
            let style = logbar::Style::new().indicator('█');
            Bar::Log(logbar::ProgressBar::with_style(len as usize, style))
        };
        // don't let log messages overwrite the bar
        log::set_max_level(LevelFilter::Off);
        Self {
            bar,
            suspended_level: Cell::new(Some(level)),
        }
    }

    /// A progress bar that shows nothing
    pub fn hidden() -> Self {
        Self {
            bar: Bar::Hidden,
            suspended_level: Cell::new(None),
        }
    }

    fn restore_log_level(&self) {
        if let Some(level) = self.suspended_level.take() {
            log::set_max_level(level);
        }
    }

    fn interactive(len: u64, message: &str) -> Bar {
        let bar = indicatif::ProgressBar::new(len);
        if let Ok(style) = indicatif::ProgressStyle::default_bar()
            .template("{bar:60.cyan/cyan} {msg} {pos}/{len} [{elapsed}]")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_owned());
        Bar::Interactive(bar)
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::hidden()
    }
}

impl Progress for ProgressBar {
    fn inc(&self, i: u64) {
        match &self.bar {
            Bar::Hidden => {}
            Bar::Interactive(bar) => bar.inc(i),
            Bar::Log(bar) => bar.inc(i as usize),
        }
    }

    fn finish(&self) {
        match &self.bar {
            Bar::Hidden => {}
            Bar::Interactive(bar) => bar.finish(),
            Bar::Log(bar) => bar.finish(),
        }
        self.restore_log_level();
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        self.restore_log_level();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // the log level is global, so all checks live in one test
    #[test]
    fn log_level_restored() {
        log_init();

        let before = log::max_level();
        let bar = ProgressBar::hidden();
        bar.inc(3);
        bar.finish();
        assert_eq!(log::max_level(), before);

        log::set_max_level(LevelFilter::Info);
        let bar = ProgressBar::new(10, "Testing:");
        bar.inc(3);
        assert_eq!(log::max_level(), LevelFilter::Off);
        bar.finish();
        assert_eq!(log::max_level(), LevelFilter::Info);
        drop(bar);
        assert_eq!(log::max_level(), LevelFilter::Info);

        // aborted loop without finish
        let bar = ProgressBar::new(10, "Testing:");
        bar.inc(1);
        drop(bar);
        assert_eq!(log::max_level(), LevelFilter::Info);

        log::set_max_level(before);
    }
}
