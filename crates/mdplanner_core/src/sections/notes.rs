//! Notes section codec.
//!
//! Note bodies are kept verbatim, including indentation and inner blank
//! lines. Revision metadata rides on the identity comment:
//! `<!-- id: note_3 | created: T | updated: T | rev: 2 -->`.

use crate::entity::{
    heading_codec, BodyStyle, BucketStyle, EntityLayout, HeadingEntity, IdScheme, RawRecord,
    Record,
};
use crate::markup::config::ConfigMap;
use crate::model::note::{Note, NOTE_MODE_SIMPLE};

impl Record for Note {
    const KIND: &'static str = "note";
    const SECTION: &'static str = "Notes";
    const ID_SCHEME: IdScheme = IdScheme::Prefixed("note_");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HeadingEntity for Note {
    const LAYOUT: EntityLayout = EntityLayout {
        body: BodyStyle::Raw,
        fields: &[],
        buckets: BucketStyle::None,
    };

    fn from_raw(raw: RawRecord) -> Self {
        let revision = raw.meta.int("rev", 1).clamp(0, i64::from(u32::MAX));
        Self {
            id: raw.id_text(),
            title: raw.title.clone(),
            content: raw.body_text(),
            created_at: raw.meta.text("created"),
            updated_at: raw.meta.text("updated"),
            revision: u32::try_from(revision).unwrap_or(1),
            mode: raw.config.text_or("mode", NOTE_MODE_SIMPLE),
        }
    }

    fn to_raw(&self) -> RawRecord {
        let mut config = ConfigMap::new();
        if self.mode != NOTE_MODE_SIMPLE && !self.mode.is_empty() {
            config.insert("mode", self.mode.clone());
        }
        let mut raw = RawRecord::new(&self.title)
            .with_id(&self.id)
            .with_config(config)
            .with_body(&self.content);
        raw.meta = ConfigMap::new()
            .with_nonempty("created", &self.created_at)
            .with_nonempty("updated", &self.updated_at)
            .with("rev", self.revision.to_string());
        raw
    }
}

heading_codec!(Note);
