//! GeoTIFF reader
//!
//! Georeferencing comes from the GeoTIFF tags, read raw through the `tiff`
//! decoder:
//! - ModelPixelScale (33550) + ModelTiepoint (33922), or
//! - ModelTransformation (34264)
//!
//! plus GDAL's ASCII no-data tag (42113). Only the first band is kept.

use super::{GeoTransform, Raster};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

// Decoded entries carry the named variants, not `Tag::Unknown`
const MODEL_PIXEL_SCALE: Tag = Tag::ModelPixelScaleTag;
const MODEL_TIEPOINT: Tag = Tag::ModelTiepointTag;
const MODEL_TRANSFORMATION: Tag = Tag::ModelTransformationTag;
const GDAL_NODATA: Tag = Tag::GdalNodata;

/// Read a GeoTIFF from disk
pub fn load(path: &Path) -> Result<Raster> {
    let file = File::open(path)
        .map_err(|e| Error::Raster(format!("Cannot open {}: {}", path.display(), e)))?;
    decode(BufReader::new(file))
}

/// Decode a GeoTIFF from any seekable reader
pub fn decode<R: Read + Seek>(reader: R) -> Result<Raster> {
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    let transform = read_transform(&mut decoder)?;
    let nodata = read_nodata(&mut decoder)?;

    let pixels = to_f64(decoder.read_image()?);
    let cells = width * height;
    if cells == 0 || pixels.len() < cells || pixels.len() % cells != 0 {
        return Err(Error::Raster(format!(
            "GeoTIFF holds {} samples for a {}x{} image",
            pixels.len(),
            width,
            height
        )));
    }
    let bands = pixels.len() / cells;
    let data = pixels.into_iter().step_by(bands).collect();

    Raster::new(width, height, data, transform, nodata)
}

fn read_transform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<GeoTransform> {
    if let Some(m) = decoder.find_tag(MODEL_TRANSFORMATION)? {
        let m = m.into_f64_vec()?;
        if m.len() < 8 {
            return Err(Error::Raster("ModelTransformation tag is too short".to_string()));
        }
        // Row-major 4x4 matrix; only the 2D affine part is used
        return Ok(GeoTransform([m[3], m[0], m[1], m[7], m[4], m[5]]));
    }

    let scale = decoder.find_tag(MODEL_PIXEL_SCALE)?;
    let tiepoint = decoder.find_tag(MODEL_TIEPOINT)?;
    match (scale, tiepoint) {
        (Some(scale), Some(tiepoint)) => {
            let scale = scale.into_f64_vec()?;
            let tie = tiepoint.into_f64_vec()?;
            if scale.len() < 2 || tie.len() < 6 {
                return Err(Error::Raster("GeoTIFF georeferencing tags are too short".to_string()));
            }
            // Tiepoint maps raster (i, j) to model (x, y)
            let (i, j, x, y) = (tie[0], tie[1], tie[3], tie[4]);
            let (sx, sy) = (scale[0], scale[1]);
            Ok(GeoTransform([x - i * sx, sx, 0.0, y + j * sy, 0.0, -sy]))
        }
        _ => Err(Error::Raster("GeoTIFF has no georeferencing tags".to_string())),
    }
}

fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<f64>> {
    let Some(value) = decoder.find_tag(GDAL_NODATA)? else {
        return Ok(None);
    };
    let text = value.into_string()?;
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if text.eq_ignore_ascii_case("nan") {
        return Ok(Some(f64::NAN));
    }
    text.parse()
        .map(Some)
        .map_err(|_| Error::Raster(format!("Invalid GDAL_NODATA value '{}'", text)))
}

fn to_f64(result: DecodingResult) -> Vec<f64> {
    match result {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use crate::raster::Sample;
    use std::io::Cursor;
    use tiff::encoder::{colortype, TiffEncoder};

    fn encode(data: &[f32], width: u32, height: u32, tags: &[(u16, Vec<f64>)], nodata: Option<&str>) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut buffer).unwrap();
            let mut image = encoder
                .new_image::<colortype::Gray32Float>(width, height)
                .unwrap();
            for (tag, values) in tags {
                image
                    .encoder()
                    .write_tag(Tag::Unknown(*tag), values.as_slice())
                    .unwrap();
            }
            if let Some(nodata) = nodata {
                image.encoder().write_tag(GDAL_NODATA, nodata).unwrap();
            }
            image.write_data(data).unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_decode_scale_and_tiepoint() {
        let data = [5.0, 6.0, 7.0, 8.0, 9.0, -9999.0];
        let bytes = encode(
            &data,
            3,
            2,
            &[
                (33550, vec![0.5, 0.5, 0.0]),
                (33922, vec![0.0, 0.0, 0.0, -9.0, 43.0, 0.0]),
            ],
            Some("-9999"),
        );
        let raster = decode(Cursor::new(bytes)).unwrap();

        assert_eq!((raster.width(), raster.height()), (3, 2));
        assert_eq!(raster.nodata(), Some(-9999.0));
        assert_eq!(raster.sample(Coordinates::new(42.9, -8.9)), Sample::Value(5.0));
        assert_eq!(raster.sample(Coordinates::new(42.1, -8.4)), Sample::Value(9.0));
        assert_eq!(raster.sample(Coordinates::new(42.1, -7.9)), Sample::NoData);
        assert_eq!(raster.valid_range(), Some((5.0, 9.0)));
    }

    #[test]
    fn test_decode_model_transformation() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let matrix = vec![
            0.25, 0.0, 0.0, -8.0, //
            0.0, -0.25, 0.0, 42.5, //
            0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ];
        let bytes = encode(&data, 2, 2, &[(34264, matrix)], None);
        let raster = decode(Cursor::new(bytes)).unwrap();

        assert_eq!(raster.nodata(), None);
        assert_eq!(raster.sample(Coordinates::new(42.2, -7.7)), Sample::Value(4.0));
    }

    #[test]
    fn test_missing_georeferencing() {
        let bytes = encode(&[1.0], 1, 1, &[], None);
        assert!(matches!(decode(Cursor::new(bytes)), Err(Error::Raster(_))));
    }

    #[test]
    fn test_georeferencing_tags_match_decoded_entries() {
        for (code, tag) in [
            (33550, MODEL_PIXEL_SCALE),
            (33922, MODEL_TIEPOINT),
            (34264, MODEL_TRANSFORMATION),
            (42113, GDAL_NODATA),
        ] {
            assert_eq!(Tag::from_u16_exhaustive(code), tag);
            assert_eq!(tag.to_u16(), code);
        }
    }

    #[test]
    fn test_not_a_tiff() {
        assert!(decode(Cursor::new(b"plain text".to_vec())).is_err());
    }
}
