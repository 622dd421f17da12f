use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use roxmltree::{Document, Node};
use voc_verifier_application::{AnnotationReader, ApplicationError};
use voc_verifier_domain::{Annotation, BoundingBox};

/// Reads Pascal-VOC style `<object>` boxes from an annotation file.
#[derive(Debug, Default)]
pub struct VocAnnotationReader;

impl AnnotationReader for VocAnnotationReader {
    fn read_annotation(&self, path: &Path) -> Result<Annotation, ApplicationError> {
        let text = fs::read_to_string(path).map_err(|error| match error.kind() {
            ErrorKind::NotFound => ApplicationError::MissingFile(path.to_path_buf()),
            _ => ApplicationError::Io(format!("{}: {error}", path.display())),
        })?;
        parse_annotation(&text).map_err(|message| ApplicationError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }
}

pub fn parse_annotation(text: &str) -> Result<Annotation, String> {
    let document = Document::parse(text).map_err(|error| error.to_string())?;
    let objects = document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("object"))
        .enumerate()
        .map(|(index, node)| {
            parse_object(node).map_err(|message| format!("object #{}: {message}", index + 1))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Annotation { objects })
}

fn parse_object(object: Node<'_, '_>) -> Result<BoundingBox, String> {
    let label = child_text(object, "name")?.to_string();
    let bndbox = child(object, "bndbox")?;
    Ok(BoundingBox {
        label,
        xmin: coordinate(bndbox, "xmin")?,
        ymin: coordinate(bndbox, "ymin")?,
        xmax: coordinate(bndbox, "xmax")?,
        ymax: coordinate(bndbox, "ymax")?,
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Result<Node<'a, 'input>, String> {
    node.children()
        .find(|candidate| candidate.has_tag_name(tag))
        .ok_or_else(|| format!("missing <{tag}>"))
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Result<&'a str, String> {
    child(node, tag)?
        .text()
        .map(str::trim)
        .ok_or_else(|| format!("empty <{tag}>"))
}

const MAX_COORDINATE: i64 = i32::MAX as i64;

/// Integer pixel coordinate; tools that write `12.0` are rounded.
fn coordinate(bndbox: Node<'_, '_>, tag: &str) -> Result<i64, String> {
    let raw = child_text(bndbox, tag)?;
    let value = match raw.parse::<i64>() {
        Ok(value) => value,
        Err(_) => raw
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && value.abs() <= MAX_COORDINATE as f64)
            .map(|value| value.round() as i64)
            .ok_or_else(|| format!("<{tag}> is not a usable number: {raw:?}"))?,
    };
    if value.unsigned_abs() > MAX_COORDINATE as u64 {
        return Err(format!("<{tag}> is out of range: {raw:?}"));
    }
    Ok(value)
}
