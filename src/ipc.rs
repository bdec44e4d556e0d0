use std::io::BufRead;
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::time::Duration;

use futures::channel::mpsc;

use crate::app::Message;
use crate::config::Power;

pub(crate) fn socket_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("retro-display.sock")
}

/// Map one control line to a message.
pub(crate) fn parse_command(line: &str) -> Option<Message> {
    match line.trim() {
        "toggle" => Some(Message::ToggleVisibility),
        "show" => Some(Message::Show),
        "hide" => Some(Message::Hide),
        "power on" => Some(Message::PowerSet(Power::On)),
        "power off" => Some(Message::PowerSet(Power::Off)),
        "power-toggle" => Some(Message::PowerToggle),
        "attach" => Some(Message::Attach),
        "detach" => Some(Message::Detach),
        "reconnect" => Some(Message::ReconnectNow),
        "theme-toggle" => Some(Message::ThemeToggle),
        cmd if cmd.starts_with("screen ") => {
            let name = cmd[7..].trim();
            (!name.is_empty()).then(|| Message::ScreenSet(name.to_string()))
        }
        _ => None,
    }
}

pub(crate) fn socket_listener() -> impl futures::Stream<Item = Message> {
    let (tx, rx) = mpsc::unbounded();
    std::thread::spawn(move || {
        let path = socket_path();
        let _ = std::fs::remove_file(&path);
        let listener = match UnixListener::bind(&path) {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("failed to bind socket {path:?}: {e}");
                return;
            }
        };
        tracing::info!("listening on {path:?}");
        for stream in listener.incoming().flatten() {
            let mut buf = String::new();
            if std::io::BufReader::new(stream).read_line(&mut buf).is_err() {
                continue;
            }
            match parse_command(&buf) {
                Some(msg) => {
                    if tx.unbounded_send(msg).is_err() {
                        break;
                    }
                }
                None => tracing::warn!("unknown command: {:?}", buf.trim()),
            }
        }
    });
    rx
}

/// Marquee clock. Runs only while the subscription asking for it exists.
pub(crate) fn tick_stream(ms: &u64) -> mpsc::UnboundedReceiver<Message> {
    let ms = *ms;
    let (tx, rx) = mpsc::unbounded();
    std::thread::spawn(move || loop {
        std::thread::sleep(Duration::from_millis(ms));
        if tx.unbounded_send(Message::MarqueeTick).is_err() {
            break;
        }
    });
    rx
}
