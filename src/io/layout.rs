use crate::error::{Error, Result};
use std::io::BufRead;

/// Removes every `open ... close` span from `text`.
fn strip_tags(text: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        match rest[start + open.len()..].find(close) {
            Some(len) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + open.len() + len + close.len()..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Reads the SVG layout that follows a `layout` line in `reader`.
///
/// Lines before `layout` are skipped, everything after it is taken as the SVG document, without its
/// XML declaration and doctype.
///
/// Fails with [Error::MissingLayout] if the input ends before a `layout` line.
pub fn read_layout<R: BufRead>(mut reader: R) -> Result<String> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(Error::MissingLayout);
        }
        if line.trim() == "layout" {
            break;
        }
    }
    let mut svg = String::new();
    reader.read_to_string(&mut svg)?;
    let svg = strip_tags(&svg, "<?xml", "?>");
    let svg = strip_tags(&svg, "<!DOCTYPE", ">");
    Ok(svg.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_prologue() {
        let input = "\n  layout \n<?xml version=\"1.0\"?>\n<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\">\n<svg><g/></svg>\n\n";
        assert_eq!(read_layout(input.as_bytes()).unwrap(), "<svg><g/></svg>");
    }

    #[test]
    fn test_plain_svg() {
        let input = "garbage\nlayout\n<svg/>";
        assert_eq!(read_layout(input.as_bytes()).unwrap(), "<svg/>");
    }

    #[test]
    fn test_missing_layout() {
        assert!(matches!(
            read_layout("done\n<svg/>\n".as_bytes()),
            Err(Error::MissingLayout)
        ));
        assert!(matches!(read_layout("".as_bytes()), Err(Error::MissingLayout)));
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("a<!x>b<!y>c", "<!", ">"), "abc");
        assert_eq!(strip_tags("a<!x", "<!", ">"), "a<!x");
    }
}
