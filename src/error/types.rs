/// 外设控制层错误
///
/// 基础协议路径（`transact` + `WaitPolicy::Forever`）没有错误返回，
/// 这里的错误只来自拓扑/配置校验和有界等待。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriphError {
    // 拓扑相关
    InvalidTopology,
    IndexOutOfRange { index: usize, count: usize },
    KindMismatch,

    // 配置相关
    InvalidConfig,

    // 完成门相关
    TimedOut { polls: u32 },
}

impl core::fmt::Display for PeriphError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            // 拓扑
            PeriphError::InvalidTopology => write!(f, "Invalid register window topology"),
            PeriphError::IndexOutOfRange { index, count } => {
                write!(f, "Instance index {} out of range (count {})", index, count)
            }
            PeriphError::KindMismatch => write!(f, "Peripheral kind mismatch"),

            // 配置
            PeriphError::InvalidConfig => write!(f, "Configuration value out of field range"),

            // 完成门
            PeriphError::TimedOut { polls } => {
                write!(f, "Completion wait timed out after {} polls", polls)
            }
        }
    }
}

pub type Result<T> = core::result::Result<T, PeriphError>;
