//! Driver tests against the simulated open-drain bus

use proptest::prelude::*;
use tilt_bus::sim::{BusEvent, NoDelay, RegisterFile, SimBus, SimPin, SimTarget};
use tilt_bus::{BusPhase, Phase};
use tilt_mpu6050::registers::{pwr_mgmt_1, reg, DEVICE_ADDRESS_AD0_HIGH};
use tilt_mpu6050::{
    AccelRange, Error, GyroRange, Mpu6050, RawVector3, SensorConfig, Vector3, DEVICE_ADDRESS,
};

type SimMpu<T> = Mpu6050<SimPin<T>, SimPin<T>, NoDelay>;

/// Register file in the state the device powers up in
fn powered_on() -> RegisterFile {
    RegisterFile::new(DEVICE_ADDRESS)
        .with_register(reg::WHO_AM_I, 0x68)
        .with_register(reg::PWR_MGMT_1, pwr_mgmt_1::SLEEP)
}

fn setup(target: RegisterFile) -> (SimBus<RegisterFile>, SimMpu<RegisterFile>) {
    let bus = SimBus::new(target);
    let mpu = Mpu6050::new(bus.engine());
    (bus, mpu)
}

/// Store a big-endian sample at `register`
fn put_i16(target: RegisterFile, register: u8, value: i16) -> RegisterFile {
    let [high, low] = value.to_be_bytes();
    target
        .with_register(register, high)
        .with_register(register + 1, low)
}

fn read_acks(events: &[BusEvent]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|e| match e {
            BusEvent::Read { acked, .. } => Some(*acked),
            _ => None,
        })
        .collect()
}

#[test]
fn test_presence_confirmed() {
    let (_bus, mut mpu) = setup(powered_on());

    let id = mpu.identify();
    assert!(id.is_acknowledged());
    assert_eq!(id.value, DEVICE_ADDRESS);
    assert_eq!(mpu.check_presence(), Ok(()));
}

#[test]
fn test_presence_wrong_identity() {
    let (_bus, mut mpu) = setup(powered_on().with_register(reg::WHO_AM_I, 0x70));

    assert_eq!(
        mpu.check_presence(),
        Err(Error::IdentityMismatch { found: 0x70 })
    );
}

#[test]
fn test_presence_no_device() {
    let target = powered_on();
    let (bus, mut mpu) = setup(target);
    bus.with_target(|t| t.set_nack_all(true));

    let id = mpu.identify();
    assert_eq!(id.status.first_nack(), Some(Phase::Address));
    // Nobody drives the line, so the pull-up reads as all ones
    assert_eq!(id.value, 0xFF);
    assert_eq!(
        mpu.check_presence(),
        Err(Error::Bus(tilt_bus::Error::Nack(Phase::Address)))
    );
}

#[test]
fn test_alternate_address_identifies_as_0x68() {
    let bus = SimBus::new(
        RegisterFile::new(DEVICE_ADDRESS_AD0_HIGH).with_register(reg::WHO_AM_I, 0x68),
    );
    let mut mpu = Mpu6050::with_address(bus.engine(), DEVICE_ADDRESS_AD0_HIGH);

    assert_eq!(mpu.address(), 0x69);
    assert_eq!(mpu.check_presence(), Ok(()));
}

#[test]
fn test_wake_clears_sleep() {
    let (bus, mut mpu) = setup(powered_on());

    assert!(mpu.wake().is_acknowledged());
    assert_eq!(bus.with_target(|t| t.get(reg::PWR_MGMT_1)), 0x00);
}

#[test]
fn test_write_register_framing() {
    let (bus, mut mpu) = setup(powered_on());

    mpu.write_register(0x19, 0x07);
    assert_eq!(
        bus.events(),
        [
            BusEvent::Start,
            BusEvent::Address {
                byte: 0xD0,
                acked: true
            },
            BusEvent::Written {
                byte: 0x19,
                acked: true
            },
            BusEvent::Written {
                byte: 0x07,
                acked: true
            },
            BusEvent::Stop,
        ]
    );
}

#[test]
fn test_read_register_framing() {
    let (bus, mut mpu) = setup(powered_on());

    assert_eq!(mpu.read_register(reg::WHO_AM_I).value, 0x68);
    assert_eq!(
        bus.events(),
        [
            BusEvent::Start,
            BusEvent::Address {
                byte: 0xD0,
                acked: true
            },
            BusEvent::Written {
                byte: 0x75,
                acked: true
            },
            BusEvent::Stop,
            BusEvent::Start,
            BusEvent::Address {
                byte: 0xD1,
                acked: true
            },
            BusEvent::Read {
                byte: 0x68,
                acked: false
            },
            BusEvent::Stop,
        ]
    );
}

#[test]
fn test_burst_read_ack_pattern() {
    let (bus, mut mpu) = setup(powered_on());

    mpu.read_bytes::<1>(0x3B);
    assert_eq!(read_acks(&bus.events()), [false]);

    bus.clear();
    mpu.read_bytes::<6>(0x3B);
    assert_eq!(
        read_acks(&bus.events()),
        [true, true, true, true, true, false]
    );

    bus.clear();
    mpu.read_bytes::<14>(0x3B);
    let acks = read_acks(&bus.events());
    assert_eq!(acks.len(), 14);
    assert_eq!(acks.iter().filter(|a| **a).count(), 13);
    assert_eq!(acks.last(), Some(&false));
}

#[test]
fn test_burst_read_ascending_order() {
    let mut target = powered_on();
    for (i, register) in (0x3B..0x41).enumerate() {
        target.set(register, i as u8 + 1);
    }
    let (_bus, mut mpu) = setup(target);

    let bytes = mpu.read_bytes::<6>(0x3B);
    assert!(bytes.is_acknowledged());
    assert_eq!(bytes.value, [1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_zero_length_read_is_silent() {
    let (bus, mut mpu) = setup(powered_on());

    let empty = mpu.read_bytes::<0>(0x3B);
    assert!(empty.is_acknowledged());
    assert!(bus.events().is_empty());
}

#[test]
fn test_accel_raw_and_g() {
    let target = put_i16(powered_on(), reg::ACCEL_XOUT_H, 16384);
    let target = put_i16(target, reg::ACCEL_XOUT_H + 2, -16384);
    let target = put_i16(target, reg::ACCEL_XOUT_H + 4, 0);
    let (_bus, mut mpu) = setup(target);

    assert_eq!(
        mpu.read_accel_raw().value,
        RawVector3 {
            x: 16384,
            y: -16384,
            z: 0
        }
    );

    let g = mpu.read_accel_g();
    assert!(g.is_acknowledged());
    assert_eq!(
        g.value,
        Vector3 {
            x: 1.0,
            y: -1.0,
            z: 0.0
        }
    );
}

#[test]
fn test_gyro_dps() {
    let target = put_i16(powered_on(), reg::GYRO_XOUT_H, 8192);
    let target = put_i16(target, reg::GYRO_XOUT_H + 2, -8192);
    let (_bus, mut mpu) = setup(target);

    let dps = mpu.read_gyro_dps().value;
    assert_eq!(dps.x, 62.5);
    assert_eq!(dps.y, -62.5);
    assert_eq!(dps.z, 0.0);
}

#[test]
fn test_temperature() {
    let (bus, mut mpu) = setup(put_i16(powered_on(), reg::TEMP_OUT_H, 0));
    assert_eq!(mpu.read_temperature_c().value, 36.53);

    bus.with_target(|t| {
        t.set(reg::TEMP_OUT_H, 0xFE);
        t.set(reg::TEMP_OUT_H + 1, 0xAC); // -340
    });
    assert_eq!(mpu.read_temperature_raw().value, -340);
    assert!((mpu.read_temperature_c().value - 35.53).abs() < 1e-4);
}

#[test]
fn test_conversion_without_bus() {
    let (_bus, mpu) = setup(powered_on());

    let g = mpu.accel_g_from_raw(RawVector3 {
        x: 16384,
        y: -16384,
        z: 0,
    });
    assert_eq!((g.x, g.y, g.z), (1.0, -1.0, 0.0));

    let dps = mpu.gyro_dps_from_raw(RawVector3 { x: 8192, y: 0, z: 0 });
    assert_eq!(dps.x, 62.5);
}

#[test]
fn test_silent_slave_completes_every_operation() {
    let (bus, mut mpu) = setup(powered_on());
    bus.with_target(|t| t.set_nack_all(true));

    assert!(!mpu.wake().is_acknowledged());
    assert!(!mpu.write_register(0x19, 1).is_acknowledged());
    assert!(!mpu.read_accel_g().is_acknowledged());
    assert!(!mpu.read_gyro_dps().is_acknowledged());
    assert!(!mpu.read_temperature_c().is_acknowledged());

    // Every START was matched by a STOP and the bus is idle
    let events = bus.events();
    let starts = events.iter().filter(|e| **e == BusEvent::Start).count();
    let stops = events.iter().filter(|e| **e == BusEvent::Stop).count();
    assert_eq!(starts, stops);
    assert_eq!(events.last(), Some(&BusEvent::Stop));
    assert!(bus.line_state().clock && bus.line_state().data);

    let engine = mpu.release();
    assert_eq!(engine.phase(), BusPhase::Idle);
}

#[test]
fn test_configure_derives_scales() {
    let (bus, mut mpu) = setup(powered_on());
    let config = SensorConfig {
        accel_range: AccelRange::G4,
        gyro_range: GyroRange::Dps2000,
        sample_rate_divider: 7,
        dlpf: 3,
    };

    assert_eq!(mpu.configure(&config), Ok(()));
    bus.with_target(|t| {
        assert_eq!(t.get(reg::SMPLRT_DIV), 7);
        assert_eq!(t.get(reg::CONFIG), 3);
        assert_eq!(t.get(reg::GYRO_CONFIG), 0x18);
        assert_eq!(t.get(reg::ACCEL_CONFIG), 0x08);
    });
    assert_eq!(mpu.accel_scale(), 4.0 / 32768.0);
    assert_eq!(mpu.gyro_scale(), 2000.0 / 32768.0);

    bus.with_target(|t| {
        t.set(reg::ACCEL_XOUT_H, 0x40); // 16384 = 2 g at ±4 g
        t.set(reg::ACCEL_XOUT_H + 1, 0x00);
    });
    assert_eq!(mpu.read_accel_g().value.x, 2.0);
}

/// Register file that refuses to change the accelerometer range
struct StuckRange(RegisterFile);

impl SimTarget for StuckRange {
    fn address(&self) -> u8 {
        self.0.address()
    }

    fn on_address(&mut self, read: bool) -> bool {
        self.0.on_address(read)
    }

    fn on_write(&mut self, byte: u8) -> bool {
        let acked = self.0.on_write(byte);
        self.0.set(reg::ACCEL_CONFIG, 0x00);
        acked
    }

    fn on_read(&mut self) -> u8 {
        self.0.on_read()
    }
}

#[test]
fn test_configure_detects_readback_mismatch() {
    let bus = SimBus::new(StuckRange(powered_on()));
    let mut mpu = Mpu6050::new(bus.engine());
    let config = SensorConfig {
        accel_range: AccelRange::G16,
        gyro_range: GyroRange::Dps2000,
        ..SensorConfig::default()
    };

    assert_eq!(
        mpu.configure(&config),
        Err(Error::ConfigMismatch {
            register: reg::ACCEL_CONFIG,
            expected: 0x18,
            found: 0x00,
        })
    );

    // The gyro range went through, so its scale must follow the device
    let device_gyro = bus.with_target(|t| t.0.get(reg::GYRO_CONFIG));
    assert_eq!(device_gyro, 0x18);
    assert_eq!(mpu.gyro_scale(), GyroRange::from_bits(device_gyro).scale());
    // Accelerometer still at the range it reads back
    assert_eq!(mpu.accel_scale(), 2.0 / 32768.0);

    bus.with_target(|t| {
        t.0.set(reg::GYRO_XOUT_H, 0x40); // 16384 = 1000 dps at ±2000 dps
        t.0.set(reg::GYRO_XOUT_H + 1, 0x00);
    });
    assert_eq!(mpu.read_gyro_dps().value.x, 1000.0);
}

/// Register file that NACKs any data written to ACCEL_CONFIG
struct RejectAccelRange {
    regs: RegisterFile,
    expect_pointer: bool,
}

impl SimTarget for RejectAccelRange {
    fn address(&self) -> u8 {
        self.regs.address()
    }

    fn on_address(&mut self, read: bool) -> bool {
        self.expect_pointer = !read;
        self.regs.on_address(read)
    }

    fn on_write(&mut self, byte: u8) -> bool {
        if !self.expect_pointer && self.regs.pointer() == reg::ACCEL_CONFIG {
            return false;
        }
        self.expect_pointer = false;
        self.regs.on_write(byte)
    }

    fn on_read(&mut self) -> u8 {
        self.regs.on_read()
    }
}

#[test]
fn test_configure_accel_write_nacked() {
    let bus = SimBus::new(RejectAccelRange {
        regs: powered_on(),
        expect_pointer: false,
    });
    let mut mpu = Mpu6050::new(bus.engine());
    let config = SensorConfig {
        accel_range: AccelRange::G8,
        gyro_range: GyroRange::Dps500,
        ..SensorConfig::default()
    };

    assert_eq!(
        mpu.configure(&config),
        Err(Error::Bus(tilt_bus::Error::Nack(Phase::Data)))
    );
    bus.with_target(|t| {
        assert_eq!(t.regs.get(reg::GYRO_CONFIG), 0x08);
        assert_eq!(t.regs.get(reg::ACCEL_CONFIG), 0x00);
    });
    assert_eq!(mpu.gyro_scale(), 500.0 / 32768.0);
    assert_eq!(mpu.accel_scale(), 2.0 / 32768.0);
}

#[test]
fn test_configure_without_device() {
    let (bus, mut mpu) = setup(powered_on());
    bus.with_target(|t| t.set_nack_all(true));

    assert_eq!(
        mpu.configure(&SensorConfig::default()),
        Err(Error::Bus(tilt_bus::Error::Nack(Phase::Address)))
    );
}

proptest! {
    #[test]
    fn prop_register_round_trip(register in any::<u8>(), value in any::<u8>()) {
        let (_bus, mut mpu) = setup(RegisterFile::new(DEVICE_ADDRESS));

        prop_assert!(mpu.write_register(register, value).is_acknowledged());
        let read = mpu.read_register(register);
        prop_assert!(read.is_acknowledged());
        prop_assert_eq!(read.value, value);
    }

    #[test]
    fn prop_accel_linear(x in any::<i16>(), y in any::<i16>(), z in any::<i16>()) {
        let target = put_i16(RegisterFile::new(DEVICE_ADDRESS), reg::ACCEL_XOUT_H, x);
        let target = put_i16(target, reg::ACCEL_XOUT_H + 2, y);
        let target = put_i16(target, reg::ACCEL_XOUT_H + 4, z);
        let (_bus, mut mpu) = setup(target);

        let g = mpu.read_accel_g().value;
        prop_assert_eq!(g.x, x as f32 * (2.0 / 32768.0));
        prop_assert_eq!(g.y, y as f32 * (2.0 / 32768.0));
        prop_assert_eq!(g.z, z as f32 * (2.0 / 32768.0));
    }
}
