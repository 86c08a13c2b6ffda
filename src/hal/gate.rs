//! # 完成门 (Completion Gate)
//!
//! 在“数据已发出”和“可以继续”之间建立顺序边界：
//! 反复读状态寄存器，直到某个忙位清零。
//!
//! 轮询本身与协议逻辑分开，等待策略和退避方式都可以注入：
//!
//! | 策略 | 行为 |
//! |------|------|
//! | `Forever` | 一直自旋，忙位永不清零就永远挂住（基础协议语义） |
//! | `MaxPolls(n)` | 最多读 n 次，之后返回 `TimedOut` |
//! | `Deadline(t)` | 按注入的 [`Clock`] 计时，超过 t 个 tick 返回 `TimedOut` |

use crate::error::{PeriphError, Result};
use crate::hal::bus::RegisterBus;

/// 两次轮询之间的退避
pub trait Backoff {
    /// `attempt` 是已经完成的读取次数（从 1 开始）
    fn relax(&mut self, attempt: u32);
}

/// 纯自旋，不让出 CPU
#[derive(Debug, Clone, Copy, Default)]
pub struct Spin;

impl Backoff for Spin {
    #[inline(always)]
    fn relax(&mut self, _attempt: u32) {
        core::hint::spin_loop();
    }
}

/// 单调时钟
pub trait Clock {
    fn now_ticks(&self) -> u64;
}

/// 等待策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// 无超时
    Forever,
    /// 最多读取次数，至少读一次
    MaxPolls(u32),
    /// 时钟 tick 数，需要配合 [`Poller::with_clock`]
    Deadline(u64),
}

/// 轮询器
pub struct Poller<'c, K: Backoff = Spin> {
    policy: WaitPolicy,
    backoff: K,
    clock: Option<&'c dyn Clock>,
}

impl Poller<'static, Spin> {
    /// 无超时的纯自旋轮询器
    pub const fn forever() -> Self {
        Self {
            policy: WaitPolicy::Forever,
            backoff: Spin,
            clock: None,
        }
    }

    /// 有读取次数上限的自旋轮询器
    pub const fn max_polls(polls: u32) -> Self {
        Self {
            policy: WaitPolicy::MaxPolls(polls),
            backoff: Spin,
            clock: None,
        }
    }
}

impl<'c, K: Backoff> Poller<'c, K> {
    pub fn new(policy: WaitPolicy, backoff: K) -> Self {
        Self {
            policy,
            backoff,
            clock: None,
        }
    }

    /// 注入时钟，`Deadline` 策略据此计时
    pub fn with_clock(mut self, clock: &'c dyn Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    pub fn backoff(&self) -> &K {
        &self.backoff
    }

    /// 轮询直到 `done()` 返回 true
    ///
    /// 成功时返回读取次数。`Deadline` 策略没有时钟时返回 `InvalidConfig`，
    /// 并且不做任何读取。
    pub fn poll_until<F>(&mut self, mut done: F) -> Result<u32>
    where
        F: FnMut() -> bool,
    {
        let start = match self.policy {
            WaitPolicy::Deadline(_) => match self.clock {
                Some(clock) => clock.now_ticks(),
                None => return Err(PeriphError::InvalidConfig),
            },
            _ => 0,
        };

        let mut polls: u32 = 0;
        loop {
            polls = polls.saturating_add(1);
            if done() {
                return Ok(polls);
            }

            let expired = match self.policy {
                WaitPolicy::Forever => false,
                WaitPolicy::MaxPolls(max) => polls >= max,
                WaitPolicy::Deadline(ticks) => self
                    .clock
                    .is_some_and(|clock| clock.now_ticks().saturating_sub(start) >= ticks),
            };
            if expired {
                crate::warn!("completion wait gave up after {} polls", polls);
                return Err(PeriphError::TimedOut { polls });
            }

            self.backoff.relax(polls);
        }
    }

    /// 轮询直到 `addr` 处 `mask` 选中的位全部清零
    pub fn await_clear<B>(&mut self, bus: &B, addr: usize, mask: u32) -> Result<u32>
    where
        B: RegisterBus + ?Sized,
    {
        self.poll_until(|| bus.read32(addr) & mask == 0)
    }

    /// 轮询直到 `addr` 处的值等于 `expected`
    pub fn await_value<B>(&mut self, bus: &B, addr: usize, mask: u32, expected: u32) -> Result<u32>
    where
        B: RegisterBus + ?Sized,
    {
        self.poll_until(|| bus.read32(addr) & mask == expected)
    }
}

impl Default for Poller<'static, Spin> {
    fn default() -> Self {
        Self::forever()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct Counting(u32);

    impl Backoff for Counting {
        fn relax(&mut self, _attempt: u32) {
            self.0 += 1;
        }
    }

    struct Stepping(Cell<u64>);

    impl Clock for Stepping {
        fn now_ticks(&self) -> u64 {
            let t = self.0.get();
            self.0.set(t + 10);
            t
        }
    }

    #[test]
    fn test_forever_returns_when_clear() {
        let mut remaining = 3;
        let mut poller = Poller::new(WaitPolicy::Forever, Counting(0));
        let polls = poller
            .poll_until(|| {
                remaining -= 1;
                remaining == 0
            })
            .unwrap();
        assert_eq!(polls, 3);
        // 最后一次读到清零后不再退避
        assert_eq!(poller.backoff().0, 2);
    }

    #[test]
    fn test_max_polls_times_out() {
        let mut poller = Poller::max_polls(4);
        assert_eq!(
            poller.poll_until(|| false),
            Err(PeriphError::TimedOut { polls: 4 })
        );
    }

    #[test]
    fn test_max_polls_zero_still_reads_once() {
        let mut poller = Poller::max_polls(0);
        assert_eq!(poller.poll_until(|| true), Ok(1));
        assert_eq!(
            poller.poll_until(|| false),
            Err(PeriphError::TimedOut { polls: 1 })
        );
    }

    #[test]
    fn test_deadline_uses_injected_clock() {
        let clock = Stepping(Cell::new(0));
        let mut poller = Poller::new(WaitPolicy::Deadline(30), Spin).with_clock(&clock);
        // start=0，每次取时间前进 10：10, 20, 30 时到期
        assert_eq!(
            poller.poll_until(|| false),
            Err(PeriphError::TimedOut { polls: 3 })
        );
    }

    #[test]
    fn test_deadline_without_clock_is_rejected() {
        let mut reads = 0;
        let mut poller = Poller::new(WaitPolicy::Deadline(5), Spin);
        assert_eq!(
            poller.poll_until(|| {
                reads += 1;
                true
            }),
            Err(PeriphError::InvalidConfig)
        );
        assert_eq!(reads, 0);
    }
}
