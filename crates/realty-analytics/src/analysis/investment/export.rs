use std::io::Write;

use super::projection::YearProjection;

/// Writes the year-by-year table as CSV, one row per projected year.
pub fn write_projection_csv<W: Write>(
    writer: W,
    years: &[YearProjection],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for year in years {
        csv_writer.serialize(year.to_view())?;
    }
    csv_writer.flush()?;
    Ok(())
}
