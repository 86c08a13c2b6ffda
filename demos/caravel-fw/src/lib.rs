//! 管理 SoC 一侧的板级协作者
//!
//! 管理核通过 housekeeping 寄存器配置用户区 GPIO，通过 CSR 打开到用户
//! 工程的 Wishbone 接口，再用管理 GPIO 报告固件就绪。

#![no_std]

use core::panic::PanicInfo;

use neon_periph::hal::{BusInterface, Mmio, PinMode, PinRouting, Poller, RegisterBus, StatusIndicator};

// housekeeping：用户区 GPIO 配置
const MPRJ_XFER: usize = 0x2600_0000;
const MPRJ_IO_BASE: usize = 0x2600_0024;

// 管理 SoC CSR
const MGMT_GPIO_OE: usize = 0xF000_3800;
const MGMT_GPIO_OUT: usize = 0xF000_380C;
const MPRJ_WB_IENA: usize = 0xF000_3000;
const HK_SPI_ENABLE: usize = 0x2610_0000;

// 每个引脚 13 位的 pad 配置
const PAD_USER_OUTPUT: u32 = 0x1808;
const PAD_USER_INPUT_PULLUP: u32 = 0x0800;

/// 用户区 GPIO 配置
///
/// 配置字先写入影子寄存器，`load_configs` 触发串行移位并等待完成。
pub struct UserPads<'a> {
    bus: &'a Mmio,
}

impl<'a> UserPads<'a> {
    pub fn new(bus: &'a Mmio) -> Self {
        Self { bus }
    }
}

impl PinRouting for UserPads<'_> {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) {
        let word = match mode {
            PinMode::Output => PAD_USER_OUTPUT,
            PinMode::InputPullUp => PAD_USER_INPUT_PULLUP,
        };
        self.bus.write32(MPRJ_IO_BASE + usize::from(pin) * 4, word);
    }

    fn load_configs(&mut self) {
        self.bus.write32(MPRJ_XFER, 1);
        // 移位完成后 xfer 自清零
        let _ = Poller::forever().await_clear(self.bus, MPRJ_XFER, 1);
    }
}

/// 用户工程 Wishbone 接口使能
pub struct UserInterface<'a> {
    bus: &'a Mmio,
}

impl<'a> UserInterface<'a> {
    pub fn new(bus: &'a Mmio) -> Self {
        Self { bus }
    }
}

impl BusInterface for UserInterface<'_> {
    fn enable_interface(&mut self) {
        self.bus.write32(MPRJ_WB_IENA, 1);
    }
}

/// 管理 GPIO，仿真测试台据此判断固件进度
pub struct MgmtGpio<'a> {
    bus: &'a Mmio,
}

impl<'a> MgmtGpio<'a> {
    /// 打开输出，同时关掉 housekeeping SPI（它与管理 GPIO 复用）
    pub fn new(bus: &'a Mmio) -> Self {
        bus.write32(MGMT_GPIO_OE, 1);
        bus.write32(HK_SPI_ENABLE, 0);
        Self { bus }
    }
}

impl StatusIndicator for MgmtGpio<'_> {
    fn set(&mut self, high: bool) {
        self.bus.write32(MGMT_GPIO_OUT, u32::from(high));
    }
}

/// 进入 `main` 之后停在这里
pub fn park() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    neon_periph::error!("panic: {}", info);
    park()
}
