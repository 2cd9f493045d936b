use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::{OutputLayout, ResultRow};

/// 按布局写出结果行 (表头 + 每行一条记录)
pub fn write_csv<W: Write>(rows: &[ResultRow], layout: OutputLayout, wtr: W) -> Result<()> {
    let mut writer = Writer::from_writer(wtr);

    writer.write_record(layout.headers())?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }

    writer.flush()?;
    Ok(())
}

/// 导出结果到 CSV 文件
pub fn export_to_csv(rows: &[ResultRow], layout: OutputLayout, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    write_csv(rows, layout, file)?;
    tracing::info!("导出 {} 行到 {}", rows.len(), output_path.display());
    Ok(())
}
