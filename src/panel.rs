/*
 *  panel.rs
 *
 *  NetWorS - worth watching
 *	(c) 2020-26 Stuart Hunter
 *
 *	Hardware boundary for the LCD panel
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::debug;
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;
use thiserror::Error;

use crate::vframebuf::VarFrameBuf;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported operation")]
    UnsupportedOperation,
}

/// Minimal abstraction over the physical panel.
///
/// Vendor silicon (controller, bus, touch overlay wiring) stays outside the
/// crate; anything that can accept a full RGB565 frame can sit behind this.
pub trait PanelDriver: Send {
    /// Panel dimensions as (width, height).
    fn dimensions(&self) -> (u32, u32);

    /// Prepare the panel for frames.
    fn init(&mut self) -> Result<(), PanelError>;

    /// Backlight level, 0-255. Panels without backlight control may refuse.
    fn set_backlight(&mut self, value: u8) -> Result<(), PanelError>;

    /// Push one composed frame to the panel.
    fn flush(&mut self, frame: &VarFrameBuf<Rgb565>) -> Result<(), PanelError>;
}

/// Headless sink: counts flushes and drops the pixels. Useful on a bench
/// with no panel attached and in tests.
#[derive(Debug, Default)]
pub struct NullPanel {
    width: u32,
    height: u32,
    pub flush_count: u64,
}

impl NullPanel {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            flush_count: 0,
        }
    }
}

impl PanelDriver for NullPanel {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn init(&mut self) -> Result<(), PanelError> {
        Ok(())
    }

    fn set_backlight(&mut self, _value: u8) -> Result<(), PanelError> {
        Ok(())
    }

    fn flush(&mut self, _frame: &VarFrameBuf<Rgb565>) -> Result<(), PanelError> {
        self.flush_count += 1;
        Ok(())
    }
}

/// Frame dumper: every flush rewrites one binary PPM file. `watch`ing the
/// file in an image viewer stands in for the panel during development.
#[derive(Debug)]
pub struct PpmPanel {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl PpmPanel {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}

impl PanelDriver for PpmPanel {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn init(&mut self) -> Result<(), PanelError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn set_backlight(&mut self, value: u8) -> Result<(), PanelError> {
        debug!("ppm panel ignoring backlight level {}", value);
        Ok(())
    }

    fn flush(&mut self, frame: &VarFrameBuf<Rgb565>) -> Result<(), PanelError> {
        let mut out = Vec::with_capacity(32 + frame.as_slice().len() * 3);
        write!(out, "P6\n{} {}\n255\n", frame.width(), frame.height())?;
        for &px in frame.as_slice() {
            // Expand 5-6-5 channels back to 8 bits for the viewer.
            out.push(px.r() << 3 | px.r() >> 2);
            out.push(px.g() << 2 | px.g() >> 4);
            out.push(px.b() << 3 | px.b() >> 2);
        }
        fs::write(&self.path, out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_panel_counts_flushes() {
        let mut panel = NullPanel::new(480, 320);
        let fb = VarFrameBuf::new(480, 320, Rgb565::BLACK);
        panel.init().unwrap();
        panel.flush(&fb).unwrap();
        panel.flush(&fb).unwrap();
        assert_eq!(panel.flush_count, 2);
    }

    #[test]
    fn ppm_panel_writes_a_complete_frame() {
        let path = std::env::temp_dir().join("networs-panel-test.ppm");
        let mut panel = PpmPanel::new(&path, 4, 2);
        panel.init().unwrap();
        let fb = VarFrameBuf::new(4, 2, Rgb565::new(31, 0, 0));
        panel.flush(&fb).unwrap();

        let bytes = fs::read(&path).unwrap();
        let header = b"P6\n4 2\n255\n";
        assert!(bytes.starts_with(header));
        assert_eq!(bytes.len(), header.len() + 4 * 2 * 3);
        // Full-scale 5-bit red expands to full-scale 8-bit red.
        assert_eq!(&bytes[header.len()..header.len() + 3], &[255, 0, 0]);
        fs::remove_file(&path).ok();
    }
}
