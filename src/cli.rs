use clap::Parser;

/// Flags the daemon understands; anything else is ignored.
const KNOWN_FLAGS: &[&str] = &["-h", "--help", "-v", "--verbose"];

#[derive(Parser, Debug, Default)]
#[command(name = "ltr_hotkeyd")]
#[command(about = "Global hotkey daemon for Linuxtrack (X11 only)")]
#[command(after_help = "\
Default hotkeys:
  F12        Recenter
  Pause      Toggle Pause
  Ctrl+F12   Quit Daemon

Hotkeys are read from ~/.config/linuxtrack/ltr_hotkey_gui.conf")]
pub struct Cli {
    /// Log every hotkey press and grab
    #[arg(short, long)]
    pub verbose: bool,

    /// Arguments dropped before parsing.
    #[arg(skip)]
    pub ignored: Vec<String>,
}

impl Cli {
    /// Parse the process arguments, ignoring unknown ones.
    pub fn parse_lenient() -> Self {
        Self::parse_lenient_from(std::env::args())
    }

    /// Parse `args` (program name first), ignoring unknown ones.
    ///
    /// `--help` prints usage and exits with status 0.
    pub fn parse_lenient_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let program = args.next().unwrap_or_else(|| "ltr_hotkeyd".to_string());

        let mut known: Vec<String> = Vec::new();
        let mut ignored = Vec::new();
        for arg in args {
            if !KNOWN_FLAGS.contains(&arg.as_str()) {
                ignored.push(arg);
            } else if !known.iter().any(|k| same_flag(k, &arg)) {
                known.push(arg);
            }
        }

        let mut cli = Cli::parse_from(std::iter::once(program).chain(known));
        cli.ignored = ignored;
        cli
    }
}

/// `-v` and `--verbose` (or `-h` and `--help`) name the same flag.
fn same_flag(a: &str, b: &str) -> bool {
    let short = |s: &str| s.trim_start_matches('-').chars().next();
    short(a) == short(b)
}
