use std::fmt::{self, Write as _};

use anyhow::Context;
use barcoders::generators::svg::SVG;
use barcoders::sym::code128::Code128;
use bytes::Bytes;

pub const UNKNOWN_ITEM: &str = "Unknown Item";

/// Fields printed on a pantry label, as they appear in the request.
#[derive(Debug, Clone)]
pub struct LabelFields<'a> {
    pub serial: &'a str,
    pub item_id: &'a str,
    pub expiration_date: &'a str,
    pub item_name: &'a str,
}

pub trait LabelRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;
    fn render(&self, label: &LabelFields<'_>) -> anyhow::Result<Bytes>;
}

// 4x6in at 300 DPI, portrait
const WIDTH: u32 = 1200;
const HEIGHT: u32 = 1800;
const BARCODE_WIDTH: u32 = 1000;
const BARCODE_HEIGHT: u32 = 300;

const HUGE: u32 = 120;
const LARGE: u32 = 80;
const MEDIUM: u32 = 60;

#[derive(Debug, Default, Clone, Copy)]
pub struct SvgLabelRenderer;

impl LabelRenderer for SvgLabelRenderer {
    fn content_type(&self) -> &'static str {
        "image/svg+xml"
    }

    fn render(&self, label: &LabelFields<'_>) -> anyhow::Result<Bytes> {
        let serial_bars = barcode(label.serial)?;
        let item_bars = barcode(label.item_id)?;
        let name = if label.item_name.trim().is_empty() {
            UNKNOWN_ITEM
        } else {
            label.item_name
        };

        let mut svg = String::with_capacity(16 * 1024);
        write_label(&mut svg, label, name, &serial_bars, &item_bars)
            .context("write label svg")?;
        Ok(Bytes::from(svg))
    }
}

fn write_label(
    svg: &mut String,
    label: &LabelFields<'_>,
    name: &str,
    serial_bars: &Barcode,
    item_bars: &Barcode,
) -> fmt::Result {
    write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    )?;
    write!(svg, r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#)?;

    let mut y = 50;
    centered_text(svg, "Serial:", y, LARGE, true)?;
    y += 90;
    place_barcode(svg, serial_bars, y)?;
    y += 310;
    centered_text(svg, label.serial, y, MEDIUM, false)?;

    y += 100;
    centered_text(svg, "Item ID:", y, LARGE, true)?;
    y += 90;
    place_barcode(svg, item_bars, y)?;
    y += 310;
    centered_text(svg, label.item_id, y, MEDIUM, false)?;

    y += 100;
    centered_text(svg, "Expires:", y, LARGE, true)?;
    y += 90;
    centered_text(svg, label.expiration_date, y, HUGE, true)?;

    y += 140;
    centered_text(svg, name, y, LARGE, true)?;

    svg.push_str("</svg>");
    Ok(())
}

fn centered_text(svg: &mut String, text: &str, top: u32, size: u32, bold: bool) -> fmt::Result {
    let weight = if bold { "bold" } else { "normal" };
    write!(
        svg,
        r#"<text x="{}" y="{top}" font-family="Roboto, Helvetica, Arial, sans-serif" font-size="{size}" font-weight="{weight}" text-anchor="middle" dominant-baseline="hanging">{}</text>"#,
        WIDTH / 2,
        escape_xml(text)
    )
}

/// Code 128 (set B) of `data`, drawn by the barcode generator.
struct Barcode {
    body: String,
    modules: usize,
}

fn barcode(data: &str) -> anyhow::Result<Barcode> {
    let encoded = Code128::new(format!("\u{0181}{data}"))
        .map_err(|e| anyhow::anyhow!("encode {data:?} as code128: {e:?}"))?
        .encode();
    let doc = SVG::new(BARCODE_HEIGHT)
        .generate(&encoded)
        .map_err(|e| anyhow::anyhow!("draw {data:?} barcode: {e:?}"))?;

    // keep the bars, drop the generator's root element
    let open = doc
        .find("<svg")
        .and_then(|start| doc[start..].find('>').map(|end| start + end));
    let body = open
        .zip(doc.rfind("</svg>"))
        .filter(|(open, close)| open < close)
        .map(|(open, close)| doc[open + 1..close].to_string())
        .with_context(|| format!("unexpected barcode svg for {data:?}"))?;
    Ok(Barcode {
        body,
        modules: encoded.len(),
    })
}

/// Nest a barcode so it is stretched over the fixed barcode box,
/// horizontally centred at `top`.
fn place_barcode(svg: &mut String, bars: &Barcode, top: u32) -> fmt::Result {
    write!(
        svg,
        r#"<svg x="{}" y="{top}" width="{BARCODE_WIDTH}" height="{BARCODE_HEIGHT}" viewBox="0 0 {} {BARCODE_HEIGHT}" preserveAspectRatio="none">{}</svg>"#,
        (WIDTH - BARCODE_WIDTH) / 2,
        bars.modules,
        bars.body
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
