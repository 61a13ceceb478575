use std::{any::Any, env, panic, process};

use backtrace::Backtrace;
use clap::Parser;

use libbufferlist::{cli::Options, logging};

fn main() {
    panic::set_hook(Box::new(|panic_info| {
        let message = panic_message(panic_info.payload());

        log::error!(
            "bufferlist {} panicked: {}",
            env!("CARGO_PKG_VERSION"),
            message
        );

        if let Some(location) = panic_info.location() {
            log::error!("  at {}:{}", location.file(), location.line());
        }

        if env::var_os("RUST_BACKTRACE").is_some_and(|value| value != "0") {
            eprintln!("{:?}", Backtrace::new());
        } else {
            eprintln!("Set RUST_BACKTRACE=1 to print a backtrace.");
        }

        process::exit(1);
    }));

    let options = Options::parse();

    let _log_guard = logging::init_logging(
        options.global.verbosity,
        options.global.color,
        options.global.log_dir.as_deref(),
    );

    if let Err(err) = options.run() {
        log::error!("{:?}", err);
        process::exit(1);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<no message>"
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn panic_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload: Box<dyn Any + Send> = Box::new(format!("formatted {}", 1));
        assert_eq!(panic_message(payload.as_ref()), "formatted 1");

        let payload: Box<dyn Any + Send> = Box::new(7_u32);
        assert_eq!(panic_message(payload.as_ref()), "<no message>");
    }
}
