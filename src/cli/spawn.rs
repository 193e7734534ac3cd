//! Background detachment by re-executing the current binary

use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use nix::unistd::setsid;

use super::args::{StartOptions, TOKEN_ENV};

/// Arguments for the detached child
fn child_args(options: &StartOptions) -> Vec<&'static str> {
    let mut args = vec!["start", "--daemon"];
    if options.local {
        args.push("--local");
    }
    args
}

/// Run the child in a new session, away from the caller's terminal
fn new_session(command: &mut Command) -> &mut Command {
    // SAFETY: the hook runs between fork and exec, where only
    // async-signal-safe calls are allowed. setsid is one and nothing else
    // is touched.
    unsafe {
        command.pre_exec(|| {
            setsid()
                .map(|_| ())
                .map_err(std::io::Error::from)
        })
    }
}

/// Start a detached copy of this executable in daemon mode.
///
/// The child leads a new session with no controlling terminal. The token
/// travels through the environment so it never shows up in the process list.
///
/// # Returns
/// The child's PID
pub fn spawn_background(options: &StartOptions) -> Result<u32, std::io::Error> {
    let exe = std::env::current_exe()?;

    let mut command = Command::new(exe);
    command
        .args(child_args(options))
        .env(TOKEN_ENV, &options.token)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let child = new_session(&mut command).spawn()?;
    Ok(child.id())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(local: bool) -> StartOptions {
        StartOptions {
            token: "secret".to_string(),
            local,
            background: true,
            daemon: false,
        }
    }

    #[test]
    fn child_runs_as_daemon() {
        assert_eq!(child_args(&options(false)), vec!["start", "--daemon"]);
    }

    #[test]
    fn child_keeps_server_choice() {
        assert_eq!(child_args(&options(true)), vec!["start", "--daemon", "--local"]);
    }

    #[test]
    fn child_leads_its_own_session() {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::{getsid, Pid};

        let mut command = Command::new("sleep");
        command.arg("5");
        let mut child = new_session(&mut command).spawn().unwrap();
        let pid = Pid::from_raw(child.id() as i32);

        let session = getsid(Some(pid)).unwrap();
        let own_session = getsid(None).unwrap();
        let _ = kill(pid, Signal::SIGKILL);
        let _ = child.wait();

        assert_eq!(session, pid);
        assert_ne!(session, own_session);
    }

    #[test]
    fn token_is_not_an_argument() {
        assert!(!child_args(&options(true)).contains(&"secret"));
    }
}
