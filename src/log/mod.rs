//! 日志模块，支持在不同环境下的日志打印
//! - QEMU/调试器环境：使用cortex-m-semihosting的hprint
//! - 测试环境：使用标准库的print
//! - 其他环境：丢弃
//!
//! 驱动的约定：配置写入打 `debug`，事务每一步打 `trace`，超时打 `warn`。

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicUsize, Ordering};

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(usize)]
pub enum LogLevel {
    /// 错误级别
    Error = 0,
    /// 警告级别
    Warn = 1,
    /// 信息级别
    Info = 2,
    /// 调试级别
    Debug = 3,
    /// 跟踪级别
    Trace = 4,
}

impl LogLevel {
    const fn from_usize(v: usize) -> Self {
        match v {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// 行首标签
    pub const fn tag(self) -> &'static str {
        match self {
            LogLevel::Error => "[ERROR] ",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG] ",
            LogLevel::Trace => "[TRACE] ",
        }
    }
}

/// 全局日志级别，默认为Info
static GLOBAL_LOG_LEVEL: AtomicUsize = AtomicUsize::new(LogLevel::Info as usize);

/// 设置全局日志级别
pub fn set_log_level(level: LogLevel) {
    GLOBAL_LOG_LEVEL.store(level as usize, Ordering::Relaxed);
}

/// 获取全局日志级别
pub fn get_log_level() -> LogLevel {
    LogLevel::from_usize(GLOBAL_LOG_LEVEL.load(Ordering::Relaxed))
}

/// 该级别当前是否输出
#[inline]
pub fn enabled(level: LogLevel) -> bool {
    level <= get_log_level()
}

/// semihosting 输出
#[cfg(all(feature = "cortex_m3", not(test)))]
#[inline(always)]
pub fn log_write(s: &str) -> fmt::Result {
    cortex_m_semihosting::hprint!("{}", s);
    Ok(())
}

/// 测试环境下打印日志
#[cfg(test)]
#[inline(always)]
pub fn log_write(s: &str) -> fmt::Result {
    std::print!("{}", s);
    Ok(())
}

/// 无输出通道时丢弃
#[cfg(all(not(test), not(feature = "cortex_m3")))]
#[inline(always)]
pub fn log_write(_s: &str) -> fmt::Result {
    Ok(())
}

/// 日志写入器
pub struct LogWriter;

impl Write for LogWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        log_write(s)
    }
}

/// 打印一行日志的宏，根据日志级别过滤
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)*) => {
        {
            let level: $crate::log::LogLevel = $level;
            if $crate::log::enabled(level) {
                use core::fmt::Write;
                let mut writer = $crate::log::LogWriter;
                let _ = writer.write_str(level.tag());
                let _ = write!(writer, $($arg)*);
                let _ = writer.write_str("\n");
            }
        }
    };
}

/// 错误级别日志
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!($crate::log::LogLevel::Error, $($arg)*)
    };
}

/// 警告级别日志
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!($crate::log::LogLevel::Warn, $($arg)*)
    };
}

/// 信息级别日志
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!($crate::log::LogLevel::Info, $($arg)*)
    };
}

/// 调试级别日志
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!($crate::log::LogLevel::Debug, $($arg)*)
    };
}

/// 跟踪级别日志
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!($crate::log::LogLevel::Trace, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_log_level_setting() {
        set_log_level(LogLevel::Info);
        assert_eq!(get_log_level(), LogLevel::Info);

        set_log_level(LogLevel::Trace);
        assert!(enabled(LogLevel::Trace));

        set_log_level(LogLevel::Error);
        assert!(!enabled(LogLevel::Warn));
        assert!(enabled(LogLevel::Error));

        set_log_level(LogLevel::Info);
    }

    #[test]
    fn test_log_level_comparison() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    #[serial]
    fn test_log_macros() {
        // 只验证展开和过滤不会崩溃
        set_log_level(LogLevel::Trace);
        crate::error!("spi{}: error", 0);
        crate::warn!("spi{}: warn", 1);
        crate::info!("info");
        crate::debug!("debug {:#x}", 0x3008_0000usize);
        crate::trace!("trace");
        set_log_level(LogLevel::Info);
    }
}
