use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Traced signal name and width, in dump order.
pub const SIGNALS: [(&str, usize); 7] = [
    ("clk", 1),
    ("rst_n", 1),
    ("ena", 1),
    ("ui_in", 8),
    ("uio_in", 8),
    ("uo_out", 8),
    ("uio_oe", 8),
];

/// One value per entry of [`SIGNALS`]; `None` dumps as `x`.
pub type Sample = [Option<u8>; SIGNALS.len()];

pub struct VcdWriter {
    writer: BufWriter<File>,
    ids: Vec<String>,
    last_values: Vec<Option<Option<u8>>>,
    timestamp: Option<u64>,
}

impl VcdWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        // VCD Header
        writeln!(writer, "$date")?;
        writeln!(
            writer,
            "  {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(writer, "$end")?;
        writeln!(writer, "$version")?;
        writeln!(writer, "  upcount")?;
        writeln!(writer, "$end")?;
        writeln!(writer, "$timescale 1ns $end")?;

        writeln!(writer, "$scope module top $end")?;
        let mut ids = Vec::with_capacity(SIGNALS.len());
        for (num, (name, width)) in SIGNALS.iter().enumerate() {
            let vcd_id = Self::generate_vcd_id(num);
            writeln!(writer, "$var wire {} {} {} $end", width, vcd_id, name)?;
            ids.push(vcd_id);
        }
        writeln!(writer, "$upscope $end")?;

        writeln!(writer, "$enddefinitions $end")?;
        writeln!(writer, "$dumpvars")?;
        writeln!(writer, "$end")?;

        Ok(Self {
            writer,
            ids,
            last_values: vec![None; SIGNALS.len()],
            timestamp: None,
        })
    }

    fn generate_vcd_id(num: usize) -> String {
        let mut id = String::new();
        let mut n = num;
        loop {
            let char = ((n % 94) + 33) as u8 as char;
            id.push(char);
            if n < 94 {
                break;
            }
            n = (n / 94) - 1;
        }
        id.chars().rev().collect()
    }

    /// Writes every signal whose value changed since the previous dump.
    pub fn dump(&mut self, timestamp: u64, sample: &Sample) -> std::io::Result<()> {
        let changed: Vec<usize> = (0..SIGNALS.len())
            .filter(|&i| self.last_values[i] != Some(sample[i]))
            .collect();
        if changed.is_empty() {
            return Ok(());
        }

        if self.timestamp.is_none_or(|last| timestamp > last) {
            writeln!(self.writer, "#{}", timestamp)?;
            self.timestamp = Some(timestamp);
        }

        for i in changed {
            let vcd_id = &self.ids[i];
            let width = SIGNALS[i].1;
            match (sample[i], width) {
                (Some(v), 1) => writeln!(self.writer, "{}{}", v & 1, vcd_id)?,
                (None, 1) => writeln!(self.writer, "x{}", vcd_id)?,
                (Some(v), w) => writeln!(self.writer, "b{:0w$b} {}", v, vcd_id, w = w)?,
                (None, w) => writeln!(self.writer, "b{} {}", "x".repeat(w), vcd_id)?,
            }
            self.last_values[i] = Some(sample[i]);
        }
        Ok(())
    }

    /// Pushes buffered changes to the file. Dropping the writer flushes too,
    /// but discards the error.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
