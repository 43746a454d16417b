use std::sync::LazyLock;

macro_rules! env_config {
    ($name:ident, $default:expr) => {
        paste::paste! {
            pub static [<AGESWEEP_ $name>]: ::std::sync::LazyLock<&'static str> = ::std::sync::LazyLock::new(|| {
                ::std::boxed::Box::leak(
                    ::std::env::var(concat!("AGESWEEP_", stringify!($name)))
                        .unwrap_or_else(|_| $default.to_string())
                        .into_boxed_str()
                )
            });
        }
    };
}

env_config!(ROOT_DIR, "logs");
env_config!(EXTENSION, ".log");
env_config!(MAX_AGE_DAYS, "7");
env_config!(RUN_AT, "02:30");

pub static MAX_AGE_DAYS: LazyLock<i64> = LazyLock::new(|| {
    AGESWEEP_MAX_AGE_DAYS
        .parse::<i64>()
        .expect("Invalid AGESWEEP_MAX_AGE_DAYS value")
});
