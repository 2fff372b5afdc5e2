//! EPUB container and package-document parsing.
//!
//! Only the parts the CBZ conversion needs: the OPF location from
//! `container.xml`, and the package's manifest, spine order and cover
//! reference. Namespace prefixes are ignored; matching is on local names,
//! which is what the files in the wild require anyway.

use anyhow::{Result, bail};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One manifest `<item>`.
#[derive(Debug, Clone)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
}

/// Parsed package document.
#[derive(Debug, Default)]
pub struct Package {
    pub items: Vec<ManifestItem>,
    /// Manifest ids in spine order.
    pub spine: Vec<String>,
    /// Manifest id of the cover image, from `<meta name="cover">`.
    pub cover_id: Option<String>,
}

impl Package {
    pub fn item(&self, id: &str) -> Option<&ManifestItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn cover(&self) -> Option<&ManifestItem> {
        self.cover_id.as_deref().and_then(|id| self.item(id))
    }
}

fn local_name(qname: &[u8]) -> &[u8] {
    qname
        .rsplit(|&b| b == b':')
        .next()
        .unwrap_or(qname)
}

fn attr_value(start: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in start.attributes().with_checks(false) {
        let attr = attr.map_err(|e| anyhow::anyhow!("malformed attribute: {e}"))?;
        if local_name(attr.key.as_ref()) == name.as_bytes() {
            let raw = String::from_utf8_lossy(attr.value.as_ref()).into_owned();
            let value = quick_xml::escape::unescape(&raw)
                .map(|v| v.into_owned())
                .unwrap_or(raw);
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// Extract the OPF path (`rootfile@full-path`) from `META-INF/container.xml`.
pub fn rootfile_path(container_xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(container_xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                if local_name(e.name().as_ref()) == b"rootfile"
                    && let Some(path) = attr_value(&e, "full-path")?
                {
                    return Ok(path);
                }
            }
            Ok(Event::Eof) => bail!("container.xml has no rootfile entry"),
            Ok(_) => {}
            Err(e) => bail!("invalid container.xml: {e}"),
        }
    }
}

/// Parse the package document (OPF).
pub fn parse_package(opf_xml: &str) -> Result<Package> {
    let mut reader = Reader::from_str(opf_xml);
    let mut package = Package::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) => match local_name(e.name().as_ref()) {
                b"item" => {
                    let id = attr_value(&e, "id")?;
                    let href = attr_value(&e, "href")?;
                    let media_type = attr_value(&e, "media-type")?;
                    if let (Some(id), Some(href), Some(media_type)) = (id, href, media_type) {
                        package.items.push(ManifestItem {
                            id,
                            href,
                            media_type,
                        });
                    }
                }
                b"itemref" => {
                    if let Some(idref) = attr_value(&e, "idref")? {
                        package.spine.push(idref);
                    }
                }
                b"meta" => {
                    if attr_value(&e, "name")?.as_deref() == Some("cover")
                        && let Some(content) = attr_value(&e, "content")?
                    {
                        package.cover_id = Some(content);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => bail!(
                "invalid package document at position {}: {e}",
                reader.error_position()
            ),
        }
    }

    if package.spine.is_empty() {
        bail!("package document has an empty spine");
    }
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: &str = concat!(
        "<?xml version=\"1.0\"?>\n",
        "<container version=\"1.0\" ",
        "xmlns=\"urn:oasis:names:tc:opendocument:xmlns:container\">\n",
        "  <rootfiles>\n",
        "    <rootfile full-path=\"OEBPS/content.opf\" ",
        "media-type=\"application/oebps-package+xml\"/>\n",
        "  </rootfiles>\n",
        "</container>\n",
    );

    const OPF: &str = concat!(
        "<?xml version=\"1.0\"?>\n",
        "<package xmlns=\"http://www.idpf.org/2007/opf\" version=\"2.0\">\n",
        "  <metadata><meta name=\"cover\" content=\"cover-img\"/></metadata>\n",
        "  <manifest>\n",
        "    <item id=\"cover-img\" href=\"images/cover.jpg\" media-type=\"image/jpeg\"/>\n",
        "    <item id=\"page1\" href=\"text/p1.xhtml\" media-type=\"application/xhtml+xml\"/>\n",
        "    <item id=\"page2\" href=\"text/p2.xhtml\" media-type=\"application/xhtml+xml\"/>\n",
        "    <item id=\"css\" href=\"style.css\" media-type=\"text/css\"/>\n",
        "  </manifest>\n",
        "  <spine><itemref idref=\"page1\"/><itemref idref=\"page2\"/></spine>\n",
        "</package>\n",
    );

    #[test]
    fn rootfile_path_is_extracted() {
        assert_eq!(rootfile_path(CONTAINER).unwrap(), "OEBPS/content.opf");
    }

    #[test]
    fn missing_rootfile_is_an_error() {
        assert!(rootfile_path("<container/>").is_err());
    }

    #[test]
    fn package_parses_manifest_spine_and_cover() {
        let package = parse_package(OPF).unwrap();
        assert_eq!(package.items.len(), 4);
        assert_eq!(package.spine, vec!["page1", "page2"]);
        assert_eq!(package.cover_id.as_deref(), Some("cover-img"));
        assert_eq!(package.cover().unwrap().href, "images/cover.jpg");
        assert_eq!(
            package.item("page1").unwrap().media_type,
            "application/xhtml+xml"
        );
    }

    #[test]
    fn empty_spine_is_an_error() {
        assert!(parse_package("<package><manifest/><spine/></package>").is_err());
    }
}
