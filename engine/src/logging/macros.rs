// Scoped logging on top of `tracing`. Each scope can be given its own level
// through the log config env var, e.g. `VR_EXPLORER_LOG=warn,teleport=debug`.

/// Log through `tracing` if the scope's configured level allows it
#[macro_export]
macro_rules! scoped_log {
    ($level:ident, $scope:expr, $($arg:tt)*) => {{
        let log_config = $crate::logging::get_log_config();
        if log_config.should_log($scope, $crate::logging::Level::$level) {
            $crate::tracing::event!($crate::logging::Level::$level, scope = $scope, $($arg)*);
        }
    }};
}

#[macro_export]
macro_rules! teleport_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "teleport", $($arg)*)
    };
}

#[macro_export]
macro_rules! locomotion_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "locomotion", $($arg)*)
    };
}

#[macro_export]
macro_rules! comfort_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "comfort", $($arg)*)
    };
}

#[macro_export]
macro_rules! input_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "input", $($arg)*)
    };
}

#[macro_export]
macro_rules! nav_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "nav", $($arg)*)
    };
}

#[macro_export]
macro_rules! physics_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "physics", $($arg)*)
    };
}

#[macro_export]
macro_rules! timer_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "timer", $($arg)*)
    };
}
