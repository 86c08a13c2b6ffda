//! # 平台协作者与上电流程
//!
//! 核心协议层只在接口边界上依赖三个外部协作者：
//!
//! - [`PinRouting`]: 把实例信号路由到物理引脚，最后统一 `load_configs`
//! - [`BusInterface`]: 打开总线接口门，之后寄存器访问才会被应答
//! - [`StatusIndicator`]: 单比特状态输出，只供外部观察
//!
//! 上电顺序用类型状态编码，顺序写错无法编译：
//!
//! ```text
//! Bringup<Routing> ──commit()──► Bringup<Committed> ──arm()──► Armed
//!   (指示灯拉低)     (load_configs)                (enable_interface)
//!                                                      │ bus()
//!                                                      ▼
//!                                                  ArmedBus ──► 驱动
//! ```

use core::marker::PhantomData;

use crate::hal::bus::RegisterBus;

/// 引脚模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// 推挽输出
    Output,
    /// 带上拉的输入
    InputPullUp,
}

/// 单个实例最多占用的引脚数
pub const MAX_PLAN_PINS: usize = 4;

/// 一个实例的引脚规划
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinPlan {
    pins: [(u8, PinMode); MAX_PLAN_PINS],
    len: usize,
}

impl PinPlan {
    /// # Panics
    ///
    /// 引脚数超过 [`MAX_PLAN_PINS`]。
    pub fn new(pins: &[(u8, PinMode)]) -> Self {
        assert!(pins.len() <= MAX_PLAN_PINS, "pin plan too long");
        let mut buf = [(0, PinMode::InputPullUp); MAX_PLAN_PINS];
        buf[..pins.len()].copy_from_slice(pins);
        Self {
            pins: buf,
            len: pins.len(),
        }
    }

    pub fn pins(&self) -> &[(u8, PinMode)] {
        &self.pins[..self.len]
    }
}

/// 引脚路由协作者
pub trait PinRouting {
    /// 暂存一个引脚的配置
    fn configure_pin(&mut self, pin: u8, mode: PinMode);

    /// 提交所有暂存的引脚配置
    fn load_configs(&mut self);
}

/// 总线接口门
///
/// 未打开时任何寄存器访问都得不到应答，事务会挂住而不是报错。
pub trait BusInterface {
    fn enable_interface(&mut self);
}

/// 状态指示输出
pub trait StatusIndicator {
    fn set(&mut self, high: bool);
}

// ============================================================================
// 上电状态标记
// ============================================================================

/// 正在配置引脚
#[derive(Debug, Clone, Copy)]
pub struct Routing;

/// 引脚配置已提交，接口门尚未打开
#[derive(Debug, Clone, Copy)]
pub struct Committed;

/// 上电流程
pub struct Bringup<P, I, S, St> {
    pins: P,
    iface: I,
    indicator: S,
    routed: usize,
    _state: PhantomData<St>,
}

impl<P: PinRouting, I: BusInterface, S: StatusIndicator> Bringup<P, I, S, Routing> {
    /// 开始上电，指示输出先拉低
    pub fn new(pins: P, iface: I, mut indicator: S) -> Self {
        indicator.set(false);
        Self {
            pins,
            iface,
            indicator,
            routed: 0,
            _state: PhantomData,
        }
    }

    /// 配置一个引脚
    pub fn route(mut self, pin: u8, mode: PinMode) -> Self {
        self.pins.configure_pin(pin, mode);
        self.routed += 1;
        self
    }

    /// 按规划配置一组引脚
    pub fn route_plan(mut self, plan: &PinPlan) -> Self {
        for &(pin, mode) in plan.pins() {
            self = self.route(pin, mode);
        }
        self
    }

    /// 提交引脚配置（Routing -> Committed）
    pub fn commit(mut self) -> Bringup<P, I, S, Committed> {
        self.pins.load_configs();
        crate::debug!("pin routing committed ({} pins)", self.routed);
        Bringup {
            pins: self.pins,
            iface: self.iface,
            indicator: self.indicator,
            routed: self.routed,
            _state: PhantomData,
        }
    }
}

impl<P: PinRouting, I: BusInterface, S: StatusIndicator> Bringup<P, I, S, Committed> {
    /// 打开总线接口门（只会发生一次，Committed 被消耗）
    pub fn arm(mut self) -> Armed<P, S> {
        self.iface.enable_interface();
        crate::info!("bus interface armed");
        Armed {
            pins: self.pins,
            indicator: self.indicator,
            ready: false,
        }
    }
}

/// 已打开接口门的令牌
pub struct Armed<P, S> {
    pins: P,
    indicator: S,
    ready: bool,
}

impl<P, S: StatusIndicator> Armed<P, S> {
    /// 授予驱动访问总线的资格
    pub fn bus<'a, B: RegisterBus + ?Sized>(&self, bus: &'a B) -> ArmedBus<'a, B> {
        ArmedBus { bus }
    }

    /// 所有实例配置完毕后拉高指示输出
    pub fn signal_ready(&mut self) {
        self.indicator.set(true);
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// 取回协作者
    pub fn into_parts(self) -> (P, S) {
        (self.pins, self.indicator)
    }
}

/// 已打开接口门的总线引用
///
/// 驱动只接受这个类型，所以“接口门打开之前访问寄存器”无法写出来。
pub struct ArmedBus<'a, B: ?Sized> {
    bus: &'a B,
}

impl<'a, B: RegisterBus + ?Sized> ArmedBus<'a, B> {
    /// 接口门已由其他途径打开（例如启动代码）
    ///
    /// 调用者负责保证门确实已经打开，否则之后的事务会挂住。
    pub fn assume_armed(bus: &'a B) -> Self {
        Self { bus }
    }

    #[inline]
    pub fn get(&self) -> &'a B {
        self.bus
    }
}

impl<B: ?Sized> Clone for ArmedBus<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: ?Sized> Copy for ArmedBus<'_, B> {}
