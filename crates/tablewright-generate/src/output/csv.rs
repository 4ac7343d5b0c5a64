use csv::{QuoteStyle, Terminator, WriterBuilder};

/// Header-only CSV template: every title quoted, `\n` line ending.
pub fn header_csv(header: &[String]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(header)?;
    writer.flush()?;
    writer.into_inner().map_err(|err| err.into_error().into())
}
