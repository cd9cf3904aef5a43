//! Output macros for the mlws CLI.
//!
//! Progress text goes to stdout, errors go to stderr behind a `❌`. Message
//! templates carry their own glyphs, so these add none of their own. Structured
//! diagnostics belong in `tracing`; these macros are for the human reading
//! the terminal.

#[macro_export]
macro_rules! ws_println {
    () => {
        println!();
    };
    ($($arg:tt)*) => {
        println!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! ws_error {
    ($($arg:tt)*) => {
        eprintln!("❌ {}", format!($($arg)*));
    }
}

