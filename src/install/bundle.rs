//! Trust bundle assembly

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Write the contents of `sources`, in order, into `dest`.
///
/// `dest` is created or truncated first. The first failing open or copy stops
/// the loop and is returned as-is; whatever was copied until then stays in
/// `dest`.
pub fn concatenate<P: AsRef<Path>>(dest: &Path, sources: &[P]) -> io::Result<()> {
    let mut out = File::create(dest)?;
    for src in sources {
        let mut input = File::open(src.as_ref())?;
        io::copy(&mut input, &mut out)?;
    }
    out.flush()
}
