use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::process;

const COMMANDS: &[(&str, &str)] = &[
    ("toggle", "show or hide the display"),
    ("show", "show the display"),
    ("hide", "hide the display"),
    ("power on", "switch the screen on"),
    ("power off", "switch the screen off"),
    ("power-toggle", "flip the power switch"),
    ("attach", "start the display (live channel, marquee)"),
    ("detach", "stop the display and close the live channel"),
    ("reconnect", "reopen the live channel now"),
    ("theme-toggle", "switch between dark and light palettes"),
    ("screen <name>", "move the display to another output"),
];

fn socket_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("retro-display.sock")
}

fn is_known(cmd: &str) -> bool {
    if let Some(name) = cmd.strip_prefix("screen ") {
        return !name.trim().is_empty();
    }
    COMMANDS
        .iter()
        .any(|(name, _)| *name == cmd && !name.contains('<'))
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        usage();
        process::exit(1);
    }

    let cmd = args.join(" ");
    if !is_known(&cmd) {
        eprintln!("unknown command: {cmd}");
        usage();
        process::exit(1);
    }

    let path = socket_path();
    let mut stream = match UnixStream::connect(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("retro-display not running ({path:?}): {e}");
            process::exit(1);
        }
    };

    if let Err(e) = writeln!(stream, "{cmd}") {
        eprintln!("failed to send command: {e}");
        process::exit(1);
    }
}

fn usage() {
    eprintln!("usage: retro-display-ctl <command>");
    eprintln!();
    eprintln!("commands:");
    for (name, help) in COMMANDS {
        eprintln!("  {name:<15} {help}");
    }
}
