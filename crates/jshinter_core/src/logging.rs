//! Per-cycle console reporting.

use owo_colors::OwoColorize;

use crate::config::{ConsoleSink, ErrorSink, HinterOptions};

/// Buffers failing-file reports during a cycle and prints them, followed
/// by a summary line, when the cycle ends.
///
/// With a custom error sink, reports go to the sink immediately and only
/// the summary reaches the console.
pub(crate) struct CycleLogger {
    enabled: bool,
    error_sink: Option<ErrorSink>,
    console: Option<ConsoleSink>,
    buffered: Vec<String>,
    failures: usize,
}

impl CycleLogger {
    pub(crate) fn new(options: &HinterOptions) -> Self {
        Self {
            enabled: options.log,
            error_sink: options.log_error.clone(),
            console: options.console.clone(),
            buffered: Vec::new(),
            failures: 0,
        }
    }

    /// Records one failing file.
    pub(crate) fn log_failure(&mut self, report: &str) {
        self.failures += 1;
        if !self.enabled {
            return;
        }
        match &self.error_sink {
            Some(sink) => sink(report),
            None => self.buffered.push(format!("{}\n", report.red())),
        }
    }

    /// Number of failing files seen so far.
    pub(crate) fn failures(&self) -> usize {
        self.failures
    }

    /// Flushes buffered reports and prints the summary.
    pub(crate) fn finish(self) {
        if !self.enabled {
            return;
        }

        if !self.buffered.is_empty() {
            self.emit(&format!("\n{}", self.buffered.join("\n")));
        }
        if self.failures > 0 {
            let noun = if self.failures == 1 { "Error" } else { "Errors" };
            let summary = format!("===== {} JSHint {}\n", self.failures, noun);
            self.emit(&summary.yellow().to_string());
        }
    }

    fn emit(&self, line: &str) {
        match &self.console {
            Some(console) => console(line),
            None => println!("{}", line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn capture(options: HinterOptions) -> (HinterOptions, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let options = options.with_console(move |line| sink.lock().unwrap().push(line.to_string()));
        (options, lines)
    }

    #[test]
    fn test_buffered_reports_and_summary() {
        let (options, lines) = capture(HinterOptions::per_file());
        let mut logger = CycleLogger::new(&options);
        logger.log_failure("core.js: line 1, col 20, Missing semicolon.\n\n1 error");
        logger.log_failure("main.js: line 1, col 1, Missing semicolon.\n\n1 error");
        logger.finish();

        let expected = vec![
            format!(
                "\n{}\n\n{}\n",
                "core.js: line 1, col 20, Missing semicolon.\n\n1 error".red(),
                "main.js: line 1, col 1, Missing semicolon.\n\n1 error".red()
            ),
            "===== 2 JSHint Errors\n".yellow().to_string(),
        ];
        assert_eq!(*lines.lock().unwrap(), expected);
    }

    #[test]
    fn test_singular_summary() {
        let (options, lines) = capture(HinterOptions::per_file());
        let mut logger = CycleLogger::new(&options);
        logger.log_failure("a.js: line 1, col 1, x\n\n1 error");
        logger.finish();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "===== 1 JSHint Error\n".yellow().to_string());
    }

    #[test]
    fn test_no_output_without_failures() {
        let (options, lines) = capture(HinterOptions::per_file());
        CycleLogger::new(&options).finish();
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_disabled_logging_still_counts() {
        let (options, lines) = capture(HinterOptions {
            log: false,
            ..HinterOptions::per_file()
        });
        let mut logger = CycleLogger::new(&options);
        logger.log_failure("a.js: line 1, col 1, x\n\n1 error");
        assert_eq!(logger.failures(), 1);
        logger.finish();
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_custom_error_sink_bypasses_buffer() {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);
        let (options, lines) = capture(
            HinterOptions::per_file()
                .with_error_sink(move |report| sink.lock().unwrap().push(report.to_string())),
        );
        let mut logger = CycleLogger::new(&options);
        logger.log_failure("a.js: line 1, col 1, x\n\n1 error");
        logger.finish();

        assert_eq!(*reports.lock().unwrap(), vec!["a.js: line 1, col 1, x\n\n1 error"]);
        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("===== 1 JSHint Error"));
    }
}
