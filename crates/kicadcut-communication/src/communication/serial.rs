//! Serial port output
//!
//! Some plotters, and USB-serial adapters in front of them, show up as serial
//! devices instead of line printers. This module enumerates candidate ports
//! and opens one as a plain byte sink.

use kicadcut_core::{Error, Result};
use std::io::Write;
use std::time::Duration;

/// Information about an available serial port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port_name: String,

    /// Port description (e.g., "USB Graphtec CAMEO 4")
    pub description: String,

    /// USB vendor ID if applicable
    pub vid: Option<u16>,

    /// USB product ID if applicable
    pub pid: Option<u16>,
}

impl SerialPortInfo {
    /// Create a new port info
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
            vid: None,
            pid: None,
        }
    }

    /// Set USB IDs
    pub fn with_usb_ids(mut self, vid: u16, pid: u16) -> Self {
        self.vid = Some(vid);
        self.pid = Some(pid);
        self
    }
}

/// List serial ports a plotter could be attached to
///
/// Filters to:
/// - Windows: COM*
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        tracing::error!("Failed to enumerate serial ports: {}", e);
        Error::other(format!("Failed to enumerate ports: {}", e))
    })?;

    Ok(ports
        .iter()
        .filter(|port| is_plotter_port(&port.port_name))
        .map(|port| {
            let info = SerialPortInfo::new(&port.port_name, port_description(port));
            match &port.port_type {
                serialport::SerialPortType::UsbPort(usb) => info.with_usb_ids(usb.vid, usb.pid),
                _ => info,
            }
        })
        .collect())
}

fn is_plotter_port(port_name: &str) -> bool {
    if let Some(number) = port_name.strip_prefix("COM") {
        return !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    }

    port_name.starts_with("/dev/ttyUSB")
        || port_name.starts_with("/dev/ttyACM")
        || port_name.starts_with("/dev/cu.usbserial-")
        || port_name.starts_with("/dev/cu.usbmodem")
}

fn port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb) => format!(
            "USB {} {}",
            usb.manufacturer.as_deref().unwrap_or("Device"),
            usb.product.as_deref().unwrap_or("Serial Port")
        ),
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// Open `port` at `baud` (8N1, no flow control) for writing
pub fn open_serial(port: &str, baud: u32) -> Result<Box<dyn Write + Send>> {
    let builder = serialport::new(port, baud)
        .timeout(Duration::from_secs(5))
        .data_bits(serialport::DataBits::Eight)
        .stop_bits(serialport::StopBits::One)
        .parity(serialport::Parity::None)
        .flow_control(serialport::FlowControl::None);

    match builder.open() {
        Ok(handle) => {
            tracing::info!("Opened serial port {} at {} baud", port, baud);
            Ok(Box::new(handle))
        }
        Err(e) => {
            tracing::warn!("Failed to open serial port {}: {}", port, e);
            Err(Error::other(format!("Failed to open port {}: {}", port, e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_patterns() {
        assert!(is_plotter_port("COM3"));
        assert!(is_plotter_port("/dev/ttyUSB0"));
        assert!(is_plotter_port("/dev/ttyACM1"));
        assert!(is_plotter_port("/dev/cu.usbmodem1421"));
        assert!(!is_plotter_port("COM"));
        assert!(!is_plotter_port("COMX"));
        assert!(!is_plotter_port("/dev/ttyS0"));
    }

    #[test]
    fn test_port_info_builder() {
        let info = SerialPortInfo::new("/dev/ttyUSB0", "USB Serial").with_usb_ids(0x0b4d, 0x1123);
        assert_eq!(info.vid, Some(0x0b4d));
        assert_eq!(info.pid, Some(0x1123));
    }
}
