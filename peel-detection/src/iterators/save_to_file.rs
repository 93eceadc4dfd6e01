use crate::PeelEvent;
use peel_common::{Force, Time};
use std::{
    fs::File,
    io::{BufWriter, Error, Write},
    path::Path,
};

/// A value which can be written as one line of a CSV file.
pub trait SavablePoint {
    /// The column names written on the first line of a saved file.
    const HEADER: &'static str;

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), Error>;
}

impl SavablePoint for (Time, Force) {
    const HEADER: &'static str = "time,force";

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writeln!(writer, "{0},{1}", self.0, self.1)
    }
}

impl SavablePoint for PeelEvent {
    const HEADER: &'static str = "started_at,peaked_at,ended_at,peak,reference_force";

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writeln!(writer, "{self}")
    }
}

pub trait SaveToFileFilter<I>
where
    I: Iterator,
    I::Item: SavablePoint,
{
    /// Writes the header and every item, returning the number of items written.
    fn save_to_writer<W: Write>(self, writer: &mut W) -> Result<usize, Error>;

    fn save_to_file(self, path: &Path) -> Result<usize, Error>;
}

impl<I> SaveToFileFilter<I> for I
where
    I: Iterator,
    I::Item: SavablePoint,
{
    fn save_to_writer<W: Write>(self, writer: &mut W) -> Result<usize, Error> {
        writeln!(writer, "{}", <I::Item as SavablePoint>::HEADER)?;
        let mut count = 0;
        for item in self {
            item.write_to(writer)?;
            count += 1;
        }
        writer.flush()?;
        Ok(count)
    }

    fn save_to_file(self, path: &Path) -> Result<usize, Error> {
        let mut file = BufWriter::new(File::create(path)?);
        self.save_to_writer(&mut file)
    }
}
