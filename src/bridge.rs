//! Debug bridge: lets the guest emit formatted log lines through the host.
//!
//! The guest imports `js."console.log"` with the fixed signature
//! `(template: i32, a0: i32, a1: i32, a2: i32)`. The template index selects a
//! [`LogTemplate`] from [`TEMPLATES`]; each argument is rendered according to
//! the template's [`ArgFormat`] and substituted for its `%<index>` placeholder.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::error::{HarnessError, Result};

/// Arguments carried by every bridge call
pub const MAX_ARGS: usize = 3;

/// How a single placeholder argument is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgFormat {
    /// Signed decimal
    Plain,
    /// Eight lowercase hex digits of the raw 32-bit value, no prefix
    Hex,
    /// `0x` and eight hex digits of the magnitude, `-` first when negative
    TypedHex,
}

#[derive(Debug, Clone, Copy)]
pub struct LogTemplate {
    pub text: &'static str,
    pub formats: &'static [ArgFormat],
}

/// Templates the guest may refer to, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TemplateId {
    ElementProduct = 0,
    WideResult = 1,
    EntryArgs = 2,
}

impl TryFrom<i32> for TemplateId {
    type Error = HarnessError;

    fn try_from(index: i32) -> Result<Self> {
        match index {
            0 => Ok(TemplateId::ElementProduct),
            1 => Ok(TemplateId::WideResult),
            2 => Ok(TemplateId::EntryArgs),
            _ => Err(HarnessError::UnknownTemplate(index)),
        }
    }
}

impl TemplateId {
    pub fn template(self) -> &'static LogTemplate {
        &TEMPLATES[self as usize]
    }
}

pub static TEMPLATES: [LogTemplate; 3] = [
    LogTemplate {
        text: "vec1[%0] * vec2[%0] = %1 * %2",
        formats: &[ArgFormat::Plain, ArgFormat::Plain, ArgFormat::Plain],
    },
    LogTemplate {
        text: "i64 result: %0%1",
        formats: &[ArgFormat::Hex, ArgFormat::Hex],
    },
    LogTemplate {
        text: "dot_product(n = %0, vec2 = %1, result = %2)",
        formats: &[ArgFormat::Plain, ArgFormat::TypedHex, ArgFormat::TypedHex],
    },
];

/// `-0x00000001`, `0x000000ff`
pub fn format_hex(value: i32) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}0x{:08x}", value.unsigned_abs())
}

pub fn format_arg(value: i32, format: ArgFormat) -> String {
    match format {
        ArgFormat::Plain => value.to_string(),
        ArgFormat::Hex => format!("{:08x}", value as u32),
        ArgFormat::TypedHex => format_hex(value),
    }
}

/// Placeholder indices in order of appearance
fn placeholders(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.split('%').skip(1).filter_map(|part| {
        let digits = part.bytes().take_while(u8::is_ascii_digit).count();
        part[..digits].parse().ok()
    })
}

impl LogTemplate {
    /// Check every placeholder has a format rule and the rules fit in a call.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.formats.len() > MAX_ARGS {
            return Err(format!(
                "{} format rules but calls carry {MAX_ARGS} arguments",
                self.formats.len()
            ));
        }
        if let Some(index) = placeholders(self.text).find(|i| *i >= self.formats.len()) {
            return Err(format!("placeholder %{index} has no format rule"));
        }
        Ok(())
    }

    /// Substitute each `%<index>` with `args[index]` formatted by its rule.
    ///
    /// A `%` not followed by a digit is copied through unchanged.
    pub fn render(&self, args: &[i32]) -> String {
        let rendered: Vec<String> = self
            .formats
            .iter()
            .zip(args)
            .map(|(format, value)| format_arg(*value, *format))
            .collect();

        let mut out = String::with_capacity(self.text.len() + 16);
        let mut rest = self.text;
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos + 1..];
            let digits = tail.bytes().take_while(u8::is_ascii_digit).count();
            match tail[..digits].parse::<usize>().ok().and_then(|i| rendered.get(i)) {
                Some(value) => out.push_str(value),
                None => {
                    out.push('%');
                    out.push_str(&tail[..digits]);
                }
            }
            rest = &tail[digits..];
        }
        out.push_str(rest);
        out
    }
}

/// Destination for rendered guest log lines.
///
/// Implementations must not fail or block the caller: a sink that cannot
/// write drops the line.
pub trait LogSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Forwards guest lines to `tracing` under the `guest` target
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, line: &str) {
        info!(target: "guest", "{line}");
    }
}

/// Keeps every line in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    lines: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl LogSink for CollectingSink {
    fn emit(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

/// Host side of the guest's `console.log` import.
#[derive(Clone)]
pub struct DebugBridge {
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for DebugBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugBridge").finish_non_exhaustive()
    }
}

impl DebugBridge {
    /// Validates the template table before any guest can call in.
    pub fn new(sink: Arc<dyn LogSink>) -> Result<Self> {
        for (index, template) in TEMPLATES.iter().enumerate() {
            template
                .validate()
                .map_err(|reason| HarnessError::InvalidTemplate { index, reason })?;
        }
        Ok(Self { sink })
    }

    /// Render template `index` with `args` and emit it.
    ///
    /// An unknown index is a contract violation by the guest; the error is
    /// surfaced as a trap and ends the run.
    pub fn call(&self, index: i32, args: [i32; MAX_ARGS]) -> Result<()> {
        let line = TemplateId::try_from(index)?.template().render(&args);
        self.sink.emit(&line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(-1), "-0x00000001");
        assert_eq!(format_hex(255), "0x000000ff");
        assert_eq!(format_hex(0), "0x00000000");
        assert_eq!(format_hex(i32::MIN), "-0x80000000");
        assert_eq!(format_hex(i32::MAX), "0x7fffffff");
    }

    #[test]
    fn test_format_arg() {
        assert_eq!(format_arg(-42, ArgFormat::Plain), "-42");
        assert_eq!(format_arg(-1, ArgFormat::Hex), "ffffffff");
        assert_eq!(format_arg(0xabc, ArgFormat::Hex), "00000abc");
        assert_eq!(format_arg(-16, ArgFormat::TypedHex), "-0x00000010");
    }

    #[test]
    fn test_render_plain() {
        let template = LogTemplate {
            text: "%0 * %1 = %2",
            formats: &[ArgFormat::Plain, ArgFormat::Plain, ArgFormat::Plain],
        };
        assert_eq!(template.render(&[3, 4, 12]), "3 * 4 = 12");
    }

    #[test]
    fn test_render_is_index_addressed() {
        let template = LogTemplate {
            text: "%2 %0 %2 %1",
            formats: &[ArgFormat::Plain, ArgFormat::Plain, ArgFormat::Plain],
        };
        assert_eq!(template.render(&[1, 2, 3]), "3 1 3 2");

        let element = TemplateId::ElementProduct.template();
        assert_eq!(element.render(&[7, 5, 6]), "vec1[7] * vec2[7] = 5 * 6");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let template = LogTemplate {
            text: "100% of %0, not %10 or %",
            formats: &[ArgFormat::Plain],
        };
        assert_eq!(template.render(&[9]), "100% of 9, not %10 or %");
    }

    #[test]
    fn test_wide_result_template() {
        let value: u64 = 0x0000_0001_ffff_fffe;
        let args = [(value >> 32) as i32, value as i32, 0];
        assert_eq!(
            TemplateId::WideResult.template().render(&args),
            "i64 result: 00000001fffffffe"
        );
    }

    #[test]
    fn test_templates_validate() {
        for template in &TEMPLATES {
            assert_eq!(template.validate(), Ok(()));
        }

        let missing = LogTemplate {
            text: "%0 %1",
            formats: &[ArgFormat::Plain],
        };
        assert!(missing.validate().is_err());

        let too_many = LogTemplate {
            text: "%0",
            formats: &[
                ArgFormat::Plain,
                ArgFormat::Plain,
                ArgFormat::Plain,
                ArgFormat::Plain,
            ],
        };
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_template_ids_match_table() {
        for index in 0..TEMPLATES.len() as i32 {
            let id = TemplateId::try_from(index).unwrap();
            assert_eq!(id as i32, index);
        }
        assert!(matches!(
            TemplateId::try_from(TEMPLATES.len() as i32),
            Err(HarnessError::UnknownTemplate(3))
        ));
        assert!(TemplateId::try_from(-1).is_err());
    }

    #[test]
    fn test_bridge_emits_to_sink() {
        let sink = Arc::new(CollectingSink::default());
        let bridge = DebugBridge::new(sink.clone()).unwrap();

        bridge.call(2, [16384, 65536, 131072]).unwrap();
        bridge.call(0, [0, 3, 4]).unwrap();

        assert_eq!(
            sink.lines(),
            vec![
                "dot_product(n = 16384, vec2 = 0x00010000, result = 0x00020000)",
                "vec1[0] * vec2[0] = 3 * 4",
            ]
        );
    }

    #[test]
    fn test_bridge_rejects_unknown_template() {
        let sink = Arc::new(CollectingSink::default());
        let bridge = DebugBridge::new(sink.clone()).unwrap();

        assert!(matches!(
            bridge.call(99, [0; MAX_ARGS]),
            Err(HarnessError::UnknownTemplate(99))
        ));
        assert!(sink.lines().is_empty());
    }
}
