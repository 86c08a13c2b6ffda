use neon_periph::config::SPI_TOPOLOGY;
use neon_periph::drivers::{Controller, SpiConfig, SpiController, SpiFleet, SpiMode};
use neon_periph::hal::{ArmedBus, Poller, Topology, TopologyConfig};
use neon_periph::regs::spi::{Ctrl, Status, CFG, CTRL, GCLK, PR, STATUS, TXDATA};
use neon_periph::sim::{Access, SimBus};
use neon_periph::PeriphError;

fn setup() -> (SimBus, Topology) {
    let topology = Topology::new(SPI_TOPOLOGY).unwrap();
    let bus = SimBus::armed();
    bus.map_topology(&topology);
    (bus, topology)
}

#[test]
fn test_five_instances_each_send_their_own_byte() {
    let (bus, topology) = setup();
    let mut fleet =
        SpiFleet::configure(ArmedBus::assume_armed(&bus), &topology, SpiConfig::default()).unwrap();

    for (i, spi) in fleet.iter_mut().enumerate() {
        bus.take_log();
        spi.transact(0xA0 + i as u8);

        // 本次事务的每一次访问都落在实例 i 的窗口里
        let log = bus.log();
        assert!(!log.is_empty());
        assert!(log.iter().all(|a| topology.owner_of(a.addr()) == Some(i)));
    }

    for instance in topology.instances() {
        let i = instance.index();
        assert_eq!(bus.writes_to(instance.reg(TXDATA)), [0xA0 + i as u32]);
        assert_eq!(bus.peek(instance.reg(PR)), 0x40);
        assert_eq!(bus.peek(instance.reg(GCLK)), 1);
        assert_eq!(bus.peek(instance.reg(CFG)), 0);
        assert_eq!(bus.peek(instance.reg(CTRL)), 0);
    }
    assert_eq!(bus.stray_accesses(), 0);
}

#[test]
fn test_scenario_register_order_for_instance_zero() {
    let (bus, topology) = setup();
    let base = topology.resolve(0);
    let spi = SpiController::new(ArmedBus::assume_armed(&bus), topology.instance(0).unwrap()).unwrap();
    let mut spi = spi.configure(SpiConfig::default()).unwrap();
    bus.script_reads(base + STATUS, &[Status::BUSY_MASK]);
    spi.transact(0xA0);

    let writes: Vec<(usize, u32)> = bus
        .log()
        .into_iter()
        .filter_map(|a| match a {
            Access::Write { addr, value } => Some((addr - base, value)),
            _ => None,
        })
        .collect();

    let ss = Ctrl::SS_MASK;
    let en = Ctrl::ENABLE_MASK;
    assert_eq!(
        writes,
        [
            (GCLK, 1),
            (CFG, 0),
            (CFG, 0),
            (PR, 0x40),
            (CTRL, ss),
            (CTRL, ss | en),
            (TXDATA, 0xA0),
            (CTRL, ss),
            (CTRL, 0),
        ]
    );

    // TXDATA 写之后、关引擎之前至少读过一次 STATUS，且最后一次读到 BUSY 清零
    let log = bus.log();
    let tx = log.iter().position(|a| a.addr() == base + TXDATA).unwrap();
    let disable = tx + log[tx..]
        .iter()
        .position(|a| *a == Access::Write { addr: base + CTRL, value: ss })
        .unwrap();
    let polls: Vec<u32> = log[tx..disable]
        .iter()
        .filter_map(|a| match *a {
            Access::Read { addr, value } if addr == base + STATUS => Some(value),
            _ => None,
        })
        .collect();
    assert_eq!(polls, [Status::BUSY_MASK, 0]);
}

#[test]
fn test_chip_select_is_never_shared() {
    let (bus, topology) = setup();
    let mut fleet =
        SpiFleet::configure(ArmedBus::assume_armed(&bus), &topology, SpiConfig::default()).unwrap();
    bus.take_log();

    fleet.get_mut(2).unwrap().transact(0x5A);

    // 实例 2 之外的 CTRL 从未被写过
    for instance in topology.instances().filter(|inst| inst.index() != 2) {
        assert!(bus.writes_to(instance.reg(CTRL)).is_empty());
    }
    let ctrl = bus.writes_to(topology.resolve(2) + CTRL);
    assert!(ctrl.iter().all(|v| v & !(Ctrl::SS_MASK | Ctrl::ENABLE_MASK) == 0));
    assert_eq!(ctrl.last(), Some(&0));
}

#[test]
fn test_per_instance_modes() {
    let (bus, topology) = setup();
    let modes = [SpiMode::Mode0, SpiMode::Mode1, SpiMode::Mode2, SpiMode::Mode3, SpiMode::Mode0];
    SpiFleet::configure_each(ArmedBus::assume_armed(&bus), &topology, |inst| {
        SpiConfig::from_mode(modes[inst.index()])
    })
    .unwrap();

    let cfgs: Vec<u32> = topology.instances().map(|inst| bus.peek(inst.reg(CFG))).collect();
    assert_eq!(cfgs, [0b00, 0b10, 0b01, 0b11, 0b00]);
}

#[test]
fn test_reconfigure_leaves_registers_unchanged() {
    let (bus, topology) = setup();
    let mut fleet =
        SpiFleet::configure(ArmedBus::assume_armed(&bus), &topology, SpiConfig::default()).unwrap();
    let before = bus.snapshot();
    for spi in fleet.iter_mut() {
        spi.reconfigure(SpiConfig::default()).unwrap();
    }
    assert_eq!(bus.snapshot(), before);
}

#[test]
fn test_stuck_busy_times_out_and_releases_bus() {
    let (bus, topology) = setup();
    let inst = topology.instance(4).unwrap();
    let spi = SpiController::new(ArmedBus::assume_armed(&bus), inst).unwrap();
    let mut spi = spi.configure(SpiConfig::default()).unwrap();
    bus.poke(inst.reg(STATUS), Status::BUSY_MASK);

    let result = spi.transact_with(0xA4, &mut Poller::max_polls(100));
    assert_eq!(result, Err(PeriphError::TimedOut { polls: 100 }));
    assert_eq!(bus.peek(inst.reg(CTRL)), 0);
    assert_eq!(spi.state(), neon_periph::drivers::TransactionState::Idle);
}

#[test]
fn test_undersized_stride_is_rejected() {
    let config = TopologyConfig {
        stride: 0x8000,
        ..SPI_TOPOLOGY
    };
    assert_eq!(Topology::new(config), Err(PeriphError::InvalidTopology));
}

#[test]
fn test_out_of_range_instance() {
    let (_bus, topology) = setup();
    assert_eq!(
        topology.instance(5),
        Err(PeriphError::IndexOutOfRange { index: 5, count: 5 })
    );
}
