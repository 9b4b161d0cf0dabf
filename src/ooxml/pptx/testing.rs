//! In-memory template packages for tests.

use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const NS_DECLS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_PML: &str = "application/vnd.openxmlformats-officedocument.presentationml";

/// Minimal PNG-looking blob; only the signature matters to format detection.
pub(crate) fn png_bytes(tag: u8) -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, tag, tag, tag]
}

pub(crate) fn jpeg_bytes(tag: u8) -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, tag, tag]
}

/// One `<p:sp>` placeholder on a layout.
#[derive(Clone)]
pub(crate) struct PlaceholderSpec {
    pub ph_type: Option<&'static str>,
    pub idx: u32,
    pub xfrm: Option<(i64, i64, i64, i64)>,
}

impl PlaceholderSpec {
    pub fn new(ph_type: Option<&'static str>, idx: u32) -> Self {
        Self {
            ph_type,
            idx,
            xfrm: None,
        }
    }

    pub fn at(mut self, left: i64, top: i64, width: i64, height: i64) -> Self {
        self.xfrm = Some((left, top, width, height));
        self
    }
}

#[derive(Clone)]
pub(crate) struct LayoutSpec {
    pub name: &'static str,
    pub placeholders: Vec<PlaceholderSpec>,
}

pub(crate) struct TemplateBuilder {
    layouts: Vec<LayoutSpec>,
    notes_master: bool,
    main_content_type: String,
    slide_images: Vec<Vec<Vec<u8>>>,
    dangling_picture: bool,
}

impl TemplateBuilder {
    /// Title Slide + Title and Content layouts, with a notes master.
    pub fn standard() -> Self {
        Self {
            layouts: vec![
                LayoutSpec {
                    name: "Title Slide",
                    placeholders: vec![
                        PlaceholderSpec::new(Some("ctrTitle"), 0).at(1524000, 1122363, 9144000, 2387600),
                        PlaceholderSpec::new(Some("subTitle"), 1).at(1524000, 3602038, 9144000, 1655762),
                        PlaceholderSpec::new(Some("dt"), 10),
                        PlaceholderSpec::new(Some("ftr"), 11),
                        PlaceholderSpec::new(Some("sldNum"), 12),
                    ],
                },
                LayoutSpec {
                    name: "Title and Content",
                    placeholders: vec![
                        PlaceholderSpec::new(Some("title"), 0),
                        PlaceholderSpec::new(None, 1),
                        PlaceholderSpec::new(Some("dt"), 10),
                    ],
                },
            ],
            notes_master: true,
            main_content_type: format!("{}.presentation.main+xml", CT_PML),
            slide_images: Vec::new(),
            dangling_picture: false,
        }
    }

    pub fn with_layouts(mut self, layouts: Vec<LayoutSpec>) -> Self {
        self.layouts = layouts;
        self
    }

    pub fn without_notes_master(mut self) -> Self {
        self.notes_master = false;
        self
    }

    pub fn as_potx(mut self) -> Self {
        self.main_content_type = format!("{}.template.main+xml", CT_PML);
        self
    }

    pub fn with_main_content_type(mut self, content_type: &str) -> Self {
        self.main_content_type = content_type.to_string();
        self
    }

    /// One existing slide holding a single picture.
    pub fn with_existing_slide_picture(self) -> Self {
        self.with_existing_slides(vec![vec![png_bytes(1)]])
    }

    /// Existing slides, each holding one picture per blob.
    pub fn with_existing_slides(mut self, slides: Vec<Vec<Vec<u8>>>) -> Self {
        self.slide_images = slides;
        self
    }

    /// Put a picture whose `r:embed` has no relationship on the first
    /// existing slide.
    pub fn with_dangling_picture(mut self) -> Self {
        self.dangling_picture = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        let mut zip = ZipWriter::new(Cursor::new(&mut data));
        let options = SimpleFileOptions::default();
        let mut put = |name: &str, body: &[u8]| {
            zip.start_file(name, options).unwrap();
            zip.write_all(body).unwrap();
        };

        let mut overrides = vec![
            ("/ppt/presentation.xml".to_string(), self.main_content_type.clone()),
            (
                "/ppt/slideMasters/slideMaster1.xml".to_string(),
                format!("{}.slideMaster+xml", CT_PML),
            ),
            (
                "/ppt/theme/theme1.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.theme+xml".to_string(),
            ),
        ];
        for i in 1..=self.layouts.len() {
            overrides.push((
                format!("/ppt/slideLayouts/slideLayout{}.xml", i),
                format!("{}.slideLayout+xml", CT_PML),
            ));
        }
        for i in 1..=self.slide_images.len() {
            overrides.push((
                format!("/ppt/slides/slide{}.xml", i),
                format!("{}.slide+xml", CT_PML),
            ));
        }
        if self.notes_master {
            overrides.push((
                "/ppt/notesMasters/notesMaster1.xml".to_string(),
                format!("{}.notesMaster+xml", CT_PML),
            ));
        }

        let mut content_types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Default Extension="jpeg" ContentType="image/jpeg"/>"#,
        );
        for (partname, ct) in &overrides {
            content_types.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                partname, ct
            ));
        }
        content_types.push_str("</Types>");
        put("[Content_Types].xml", content_types.as_bytes());

        put(
            "_rels/.rels",
            rels(&[("rId1", "officeDocument", "ppt/presentation.xml")]).as_bytes(),
        );

        // presentation.xml and its rels
        let mut pres_rels = vec![
            ("rId1".to_string(), "slideMaster", "slideMasters/slideMaster1.xml".to_string()),
            ("rId2".to_string(), "theme", "theme/theme1.xml".to_string()),
        ];
        if self.notes_master {
            pres_rels.push(("rId3".to_string(), "notesMaster", "notesMasters/notesMaster1.xml".to_string()));
        }
        let mut sld_ids = String::new();
        for i in 1..=self.slide_images.len() {
            let r_id = format!("rId{}", 10 + i);
            sld_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 255 + i, r_id));
            pres_rels.push((r_id, "slide", format!("slides/slide{}.xml", i)));
        }
        let notes_list = if self.notes_master {
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="rId3"/></p:notesMasterIdLst>"#
        } else {
            ""
        };
        let sld_list = if sld_ids.is_empty() {
            String::new()
        } else {
            format!("<p:sldIdLst>{}</p:sldIdLst>", sld_ids)
        };
        put(
            "ppt/presentation.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{}{}<p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
                NS_DECLS, notes_list, sld_list
            )
            .as_bytes(),
        );
        let pres_rels: Vec<(&str, &str, &str)> = pres_rels
            .iter()
            .map(|(id, ty, target)| (id.as_str(), *ty, target.as_str()))
            .collect();
        put("ppt/_rels/presentation.xml.rels", rels(&pres_rels).as_bytes());

        // master
        let mut layout_ids = String::new();
        let mut master_rels: Vec<(String, &str, String)> =
            vec![("rId1".to_string(), "theme", "../theme/theme1.xml".to_string())];
        for i in 1..=self.layouts.len() {
            let r_id = format!("rId{}", i + 1);
            layout_ids.push_str(&format!(
                r#"<p:sldLayoutId id="{}" r:id="{}"/>"#,
                2147483648u64 + i as u64,
                r_id
            ));
            master_rels.push((r_id, "slideLayout", format!("../slideLayouts/slideLayout{}.xml", i)));
        }
        let master_shapes = [
            PlaceholderSpec::new(Some("title"), 0).at(838200, 365125, 10515600, 1325563),
            PlaceholderSpec::new(Some("body"), 1).at(838200, 1825625, 10515600, 4351338),
            PlaceholderSpec::new(Some("pic"), 2).at(7000000, 1825625, 4000000, 3000000),
        ];
        put(
            "ppt/slideMasters/slideMaster1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster {}><p:cSld><p:spTree>{}{}</p:spTree></p:cSld><p:sldLayoutIdLst>{}</p:sldLayoutIdLst></p:sldMaster>"#,
                NS_DECLS,
                GROUP_PROPS,
                placeholder_shapes(&master_shapes),
                layout_ids
            )
            .as_bytes(),
        );
        let master_rels: Vec<(&str, &str, &str)> = master_rels
            .iter()
            .map(|(id, ty, target)| (id.as_str(), *ty, target.as_str()))
            .collect();
        put("ppt/slideMasters/_rels/slideMaster1.xml.rels", rels(&master_rels).as_bytes());

        // layouts
        for (i, layout) in self.layouts.iter().enumerate() {
            put(
                &format!("ppt/slideLayouts/slideLayout{}.xml", i + 1),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout {}><p:cSld name="{}"><p:spTree>{}{}</p:spTree></p:cSld></p:sldLayout>"#,
                    NS_DECLS,
                    layout.name,
                    GROUP_PROPS,
                    placeholder_shapes(&layout.placeholders)
                )
                .as_bytes(),
            );
            put(
                &format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
                rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]).as_bytes(),
            );
        }

        // existing slides with pictures
        let mut media_n = 0;
        for (i, images) in self.slide_images.iter().enumerate() {
            let mut shapes = String::new();
            let mut slide_rels: Vec<(String, &str, String)> = vec![(
                "rId1".to_string(),
                "slideLayout",
                "../slideLayouts/slideLayout1.xml".to_string(),
            )];
            for (j, blob) in images.iter().enumerate() {
                media_n += 1;
                let ext = if blob.starts_with(&[0xFF, 0xD8]) { "jpeg" } else { "png" };
                let r_id = format!("rId{}", j + 2);
                shapes.push_str(&format!(
                    r#"<p:pic><p:nvPicPr><p:cNvPr id="{}" name="Picture {}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="914400"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
                    j + 2,
                    j + 1,
                    r_id
                ));
                let target = format!("../media/image{}.{}", media_n, ext);
                put(&format!("ppt/media/image{}.{}", media_n, ext), blob);
                slide_rels.push((r_id, "image", target));
            }
            if i == 0 && self.dangling_picture {
                shapes.push_str(r#"<p:pic><p:nvPicPr><p:cNvPr id="90" name="Broken"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId99"/></p:blipFill><p:spPr/></p:pic>"#);
            }
            shapes.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="99" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>Old slide</a:t></a:r></a:p></p:txBody></p:sp>"#);
            put(
                &format!("ppt/slides/slide{}.xml", i + 1),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {}><p:cSld><p:spTree>{}{}</p:spTree></p:cSld></p:sld>"#,
                    NS_DECLS, GROUP_PROPS, shapes
                )
                .as_bytes(),
            );
            let slide_rels: Vec<(&str, &str, &str)> = slide_rels
                .iter()
                .map(|(id, ty, target)| (id.as_str(), *ty, target.as_str()))
                .collect();
            put(&format!("ppt/slides/_rels/slide{}.xml.rels", i + 1), rels(&slide_rels).as_bytes());
        }

        put(
            "ppt/theme/theme1.xml",
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements/></a:theme>"#,
        );

        if self.notes_master {
            put(
                "ppt/notesMasters/notesMaster1.xml",
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:notesMaster {}><p:cSld><p:spTree>{}{}</p:spTree></p:cSld></p:notesMaster>"#,
                    NS_DECLS,
                    GROUP_PROPS,
                    placeholder_shapes(&[
                        PlaceholderSpec::new(Some("sldImg"), 2),
                        PlaceholderSpec::new(Some("body"), 3),
                    ])
                )
                .as_bytes(),
            );
            put(
                "ppt/notesMasters/_rels/notesMaster1.xml.rels",
                rels(&[("rId1", "theme", "../theme/theme1.xml")]).as_bytes(),
            );
        }

        zip.finish().unwrap();
        data
    }
}

const GROUP_PROPS: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#;

fn placeholder_shapes(specs: &[PlaceholderSpec]) -> String {
    let mut xml = String::new();
    for (i, spec) in specs.iter().enumerate() {
        let type_attr = spec
            .ph_type
            .map(|t| format!(r#" type="{}""#, t))
            .unwrap_or_default();
        let idx_attr = if spec.idx == 0 {
            String::new()
        } else {
            format!(r#" idx="{}""#, spec.idx)
        };
        let sp_pr = match spec.xfrm {
            Some((x, y, cx, cy)) => format!(
                r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr>"#,
                x, y, cx, cy
            ),
            None => "<p:spPr/>".to_string(),
        };
        xml.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{} {}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph{}{}/></p:nvPr></p:nvSpPr>{}<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>Click to edit</a:t></a:r></a:p></p:txBody></p:sp>"#,
            i + 2,
            spec.ph_type.unwrap_or("Content Placeholder"),
            i + 1,
            type_attr,
            idx_attr,
            sp_pr
        ));
    }
    xml
}

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, short_type, target) in entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, REL_BASE, short_type, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}
