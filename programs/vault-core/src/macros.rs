/// Guard a condition, returning a typed error (with its call site logged) instead of
/// letting an invariant violation pass silently. Used throughout `guards.rs` and the
/// position engine in place of a bare `if !cond { return Err(...) }`.
#[macro_export]
macro_rules! validate {
    ($assert:expr, $err:expr) => {{
        if !($assert) {
            let caller = std::panic::Location::caller();
            log::warn!(
                "vault invariant failed at {}:{}: {}",
                caller.file(),
                caller.line(),
                stringify!($assert)
            );
            Err($err)
        } else {
            Ok(())
        }
    }};
    ($assert:expr, $err:expr, $($arg:tt)+) => {{
        if !($assert) {
            let caller = std::panic::Location::caller();
            log::warn!(
                "vault invariant failed at {}:{}: {}",
                caller.file(),
                caller.line(),
                format_args!($($arg)+)
            );
            Err($err)
        } else {
            Ok(())
        }
    }};
}
