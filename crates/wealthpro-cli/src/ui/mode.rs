//! Output mode routing.

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// A single JSON document, nothing else
    Json,
    /// `key=value` lines and space-separated rows, stable for scripts
    #[default]
    Plain,
    /// Tables, badges and color for a terminal
    Pretty,
}

impl OutputMode {
    /// Resolve the mode from flags and the terminal.
    ///
    /// `--json` wins over everything. `--format plain` and `TERM=dumb`
    /// force plain. Otherwise a TTY gets pretty output and anything else
    /// gets plain.
    pub fn resolve(
        json_flag: bool,
        format_flag: Option<&str>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> Self {
        if json_flag {
            return Self::Json;
        }
        if format_flag.is_some_and(|fmt| fmt.eq_ignore_ascii_case("plain")) || term_is_dumb {
            return Self::Plain;
        }
        if is_tty {
            Self::Pretty
        } else {
            Self::Plain
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}
