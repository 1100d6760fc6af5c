use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use json::{JsonValue, object};

use crate::{
    dithering::{Dither, Parallelism, halftone::HalftoneCluster},
    error::{Error, Result},
    machines::{
        Machine, MachineSettings,
        zx_spectrum::{DEFAULT_BRIGHT_EDGE, DEFAULT_SATURATION, ZxSelector},
    },
};

/// Everything one run needs, as read from a JSON file.
///
/// Only `machine` is required. Selectors accept their names, `dither` and
/// `halftone` also accept the numeric radio index.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessConfig {
    pub machine: Machine,
    pub settings: MachineSettings,
    /// resize before processing, keeping the other side when only one is set
    pub processing_width: Option<u32>,
    pub processing_height: Option<u32>,
    /// nearest neighbor upscale of the result
    pub output_scale: u32,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            machine: Machine::default(),
            settings: MachineSettings::default(),
            processing_width: None,
            processing_height: None,
            output_scale: 1,
        }
    }
}

fn config_error<T>(msg: &str) -> Result<T> {
    Err(Error::Config(msg.to_string()))
}

fn optional_u32(json: &JsonValue, key: &str) -> Result<Option<u32>> {
    if json[key].is_null() {
        return Ok(None);
    }
    match json[key].as_u32() {
        Some(val) => Ok(Some(val)),
        None => config_error(&format!("Couldn't parse {key}")),
    }
}

fn optional_bool(json: &JsonValue, key: &str, default: bool) -> Result<bool> {
    if json[key].is_null() {
        return Ok(default);
    }
    match json[key].as_bool() {
        Some(val) => Ok(val),
        None => config_error(&format!("Couldn't parse {key}")),
    }
}

/// Integer field that must fit a `u8` in `0..=max`.
fn optional_level(json: &JsonValue, key: &'static str, default: u8, max: u8) -> Result<u8> {
    match optional_u32(json, key)? {
        None => Ok(default),
        Some(val) if val <= max as u32 => Ok(val as u8),
        Some(val) => Err(Error::invalid(key, val)),
    }
}

impl ProcessConfig {
    pub fn from_json(json_string: &str) -> Result<ProcessConfig> {
        let json = json::parse(json_string)?;

        let machine: Machine = match json["machine"].as_str() {
            Some(s) => s.parse()?,
            None => return config_error("Couldn't parse machine"),
        };

        let dither = if json["dither"].is_null() {
            Dither::None
        } else if let Some(index) = json["dither"].as_u8() {
            Dither::from_index(index)?
        } else if let Some(name) = json["dither"].as_str() {
            name.parse()?
        } else {
            return config_error("Couldn't parse dither");
        };

        let halftone = if json["halftone"].is_null() {
            HalftoneCluster::One
        } else if let Some(index) = json["halftone"].as_u8() {
            HalftoneCluster::from_index(index)?
        } else if let Some(name) = json["halftone"].as_str() {
            HalftoneCluster::from_name(name)?
        } else {
            return config_error("Couldn't parse halftone");
        };

        let zx_selector = match json["zx_selector"].as_str() {
            None if json["zx_selector"].is_null() => ZxSelector::Search,
            None => return config_error("Couldn't parse zx_selector"),
            Some(s) => match s.parse()? {
                ZxSelector::Saturation { .. } => ZxSelector::saturation(
                    optional_level(&json, "bright_edge", DEFAULT_BRIGHT_EDGE, u8::MAX)?,
                    optional_level(&json, "saturation", DEFAULT_SATURATION, u8::MAX)?,
                ),
                selector => selector,
            },
        };

        let parallelism: Parallelism = match json["parallelism"].as_str() {
            None if json["parallelism"].is_null() => Parallelism::Auto,
            None => return config_error("Couldn't parse parallelism"),
            Some(s) => s.parse()?,
        };

        let output_scale = match optional_u32(&json, "output_scale")? {
            None => 1,
            Some(0) => return Err(Error::invalid("output_scale", 0)),
            Some(val) => val,
        };

        let settings = MachineSettings {
            dither,
            strength: optional_level(&json, "strength", 100, 100)?,
            serpentine: optional_bool(&json, "serpentine", true)?,
            halftone,
            use_halftone: optional_bool(&json, "use_halftone", true)?,
            zx_selector,
            parallelism,
        };

        Ok(ProcessConfig {
            machine,
            settings,
            processing_width: optional_u32(&json, "processing_width")?,
            processing_height: optional_u32(&json, "processing_height")?,
            output_scale,
        })
    }

    pub fn to_json(&self) -> String {
        let settings = &self.settings;
        let mut data = object! {
            machine: self.machine,
            dither: settings.dither,
            strength: settings.strength,
            serpentine: settings.serpentine,
            halftone: settings.halftone,
            use_halftone: settings.use_halftone,
            zx_selector: settings.zx_selector,
            parallelism: settings.parallelism,
            output_scale: self.output_scale,
        };
        if let ZxSelector::Saturation {
            bright_edge,
            saturation,
        } = settings.zx_selector
        {
            data["bright_edge"] = bright_edge.into();
            data["saturation"] = saturation.into();
        }
        if let Some(width) = self.processing_width {
            data["processing_width"] = width.into();
        }
        if let Some(height) = self.processing_height {
            data["processing_height"] = height.into();
        }

        data.to_string()
    }

    pub fn read_config<P: AsRef<Path>>(path: P) -> Result<ProcessConfig> {
        let mut file = File::open(path)?;
        let mut buff = String::new();
        file.read_to_string(&mut buff)?;

        ProcessConfig::from_json(&buff)
    }

    pub fn write_config<P: AsRef<Path>>(&self, path: P) -> Result {
        let string = self.to_json();
        let mut file = File::create(path)?;
        file.write_all(string.as_bytes())?;
        Ok(())
    }
}

impl From<Machine> for JsonValue {
    fn from(machine: Machine) -> Self {
        JsonValue::String(machine.name().to_string())
    }
}

impl From<Dither> for JsonValue {
    fn from(dither: Dither) -> Self {
        JsonValue::String(dither.name().to_string())
    }
}

impl From<HalftoneCluster> for JsonValue {
    fn from(cluster: HalftoneCluster) -> Self {
        JsonValue::String(cluster.name().to_string())
    }
}

impl From<ZxSelector> for JsonValue {
    fn from(selector: ZxSelector) -> Self {
        JsonValue::String(selector.name().to_string())
    }
}

impl From<Parallelism> for JsonValue {
    fn from(parallelism: Parallelism) -> Self {
        JsonValue::String(parallelism.name().to_string())
    }
}
