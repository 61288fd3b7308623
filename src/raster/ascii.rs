//! Esri ASCII grid reader (`.asc`)

use super::{GeoTransform, Raster};
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read an ASCII grid from disk
pub fn load(path: &Path) -> Result<Raster> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

/// Parse an ASCII grid
///
/// Accepts both `xllcorner`/`yllcorner` and `xllcenter`/`yllcenter` headers;
/// `NODATA_value` is optional.
pub fn parse(content: &str) -> Result<Raster> {
    let mut ncols = None;
    let mut nrows = None;
    let mut xll = None;
    let mut yll = None;
    let mut centered = false;
    let mut cellsize = None;
    let mut nodata = None;
    let mut data = Vec::new();

    for line in content.lines() {
        let mut tokens = line.split_whitespace().peekable();
        let Some(first) = tokens.peek().copied() else {
            continue;
        };

        if first.starts_with(|c: char| c.is_ascii_alphabetic()) {
            let key = first.to_ascii_lowercase();
            tokens.next();
            let value = tokens
                .next()
                .ok_or_else(|| Error::Raster(format!("ASCII grid header '{}' has no value", key)))?;
            let number: f64 = value
                .parse()
                .map_err(|_| Error::Raster(format!("Invalid ASCII grid header {} {}", key, value)))?;
            match key.as_str() {
                "ncols" => ncols = Some(number as usize),
                "nrows" => nrows = Some(number as usize),
                "xllcorner" => xll = Some(number),
                "yllcorner" => yll = Some(number),
                "xllcenter" => {
                    xll = Some(number);
                    centered = true;
                }
                "yllcenter" => {
                    yll = Some(number);
                    centered = true;
                }
                "cellsize" => cellsize = Some(number),
                "nodata_value" => nodata = Some(number),
                other => {
                    return Err(Error::Raster(format!("Unknown ASCII grid header '{}'", other)));
                }
            }
            continue;
        }

        for token in tokens {
            let v: f64 = token
                .parse()
                .map_err(|_| Error::Raster(format!("Invalid ASCII grid value '{}'", token)))?;
            data.push(v);
        }
    }

    let missing = |name: &str| Error::Raster(format!("ASCII grid is missing '{}'", name));
    let ncols = ncols.ok_or_else(|| missing("ncols"))?;
    let nrows = nrows.ok_or_else(|| missing("nrows"))?;
    let xll = xll.ok_or_else(|| missing("xllcorner"))?;
    let yll = yll.ok_or_else(|| missing("yllcorner"))?;
    let cellsize = cellsize.ok_or_else(|| missing("cellsize"))?;

    let (left, bottom) = if centered {
        (xll - cellsize / 2.0, yll - cellsize / 2.0)
    } else {
        (xll, yll)
    };
    let top = bottom + nrows as f64 * cellsize;

    Raster::new(
        ncols,
        nrows,
        data,
        GeoTransform::north_up(left, top, cellsize, cellsize),
        nodata,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use crate::raster::Sample;
    use std::io::Write;

    const GRID: &str = "\
ncols 3
nrows 2
xllcorner -9.0
yllcorner 42.0
cellsize 0.5
NODATA_value -9999
6.5 7.0 -9999
8.0 9.5 10.0
";

    #[test]
    fn test_parse_corner_grid() {
        let raster = parse(GRID).unwrap();
        assert_eq!((raster.width(), raster.height()), (3, 2));
        assert_eq!(raster.nodata(), Some(-9999.0));
        // First data row is the northern one
        assert_eq!(raster.sample(Coordinates::new(42.9, -8.9)), Sample::Value(6.5));
        assert_eq!(raster.sample(Coordinates::new(42.1, -7.9)), Sample::Value(10.0));
        assert_eq!(raster.sample(Coordinates::new(42.9, -7.9)), Sample::NoData);
        assert_eq!(raster.valid_range(), Some((6.5, 10.0)));
    }

    #[test]
    fn test_parse_center_grid() {
        let grid = GRID
            .replace("xllcorner -9.0", "xllcenter -8.75")
            .replace("yllcorner 42.0", "yllcenter 42.25");
        let raster = parse(&grid).unwrap();
        assert_eq!(raster, parse(GRID).unwrap());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("ncols 2\nnrows 1\n1 2").is_err());
        assert!(parse(&GRID.replace("10.0", "")).is_err());
        assert!(parse(&GRID.replace("9.5", "abc")).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".asc").tempfile().unwrap();
        file.write_all(GRID.as_bytes()).unwrap();
        let raster = crate::raster::load_raster(file.path()).unwrap();
        assert_eq!(raster.width(), 3);
    }
}
