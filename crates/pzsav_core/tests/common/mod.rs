#![allow(dead_code)]

//! Builders assembling well-formed synthetic save buffers for integration
//! tests. The layout mirrors what the scanner expects: wide strings,
//! 4-byte 0xFF boundary runs, a 132-byte stats head, hero blocks, wide
//! citation pairs, and a 4-byte inter-record gap.

pub const STATS_HEAD_LEN: usize = 132;

pub fn wide(s: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for ch in s.bytes() {
        out.push(ch);
        out.push(0x00);
    }
    out
}

pub fn wide_cstr(s: &str) -> Vec<u8> {
    let mut out = wide(s);
    out.extend_from_slice(&[0x00, 0x00]);
    out
}

pub struct SyntheticHero {
    pub name: String,
    pub image: String,
    pub stats: [u16; 16],
}

impl SyntheticHero {
    pub fn new(name: &str, image: &str, stats: [u16; 16]) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            stats,
        }
    }

    fn build(&self) -> Vec<u8> {
        let mut out = wide_cstr(&self.name);
        out.extend_from_slice(&1u32.to_le_bytes()); // type tag
        out.extend(wide_cstr(&self.image));
        out.extend_from_slice(&[0xFF; 4]);
        for v in &self.stats {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.extend_from_slice(&[0x00, 0x00]);
        out
    }
}

pub struct RecordBuilder {
    name: String,
    stats: Vec<(usize, u16)>,
    history_text: Option<String>,
    heroes: Vec<SyntheticHero>,
    citations: Vec<String>,
}

impl RecordBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stats: Vec::new(),
            history_text: None,
            heroes: Vec::new(),
            citations: Vec::new(),
        }
    }

    /// Sets a 16-bit value at the given element index of the stats head.
    pub fn stat(mut self, index: usize, value: u16) -> Self {
        self.stats.push((index, value));
        self
    }

    pub fn history(mut self, text: &str) -> Self {
        self.history_text = Some(text.to_string());
        self
    }

    pub fn hero(mut self, hero: SyntheticHero) -> Self {
        self.heroes.push(hero);
        self
    }

    pub fn citation(mut self, text: &str) -> Self {
        self.citations.push(text.to_string());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = wide_cstr(&self.name);
        out.extend_from_slice(&[0xFF; 4]);

        let mut head = vec![0u8; STATS_HEAD_LEN];
        for &(index, value) in &self.stats {
            head[index * 2..index * 2 + 2].copy_from_slice(&value.to_le_bytes());
        }
        out.extend(head);
        if let Some(text) = &self.history_text {
            out.extend(wide(text));
        }
        out.extend_from_slice(&[0xFF; 4]);

        out.push(self.heroes.len() as u8);
        if !self.heroes.is_empty() {
            out.extend_from_slice(&[0u8; 7]);
            for hero in &self.heroes {
                out.extend(hero.build());
            }
        }

        for citation in &self.citations {
            out.extend(wide(citation));
            out.extend_from_slice(&[0x00, 0x00]);
        }
        out.extend_from_slice(&[0xFF; 4]);
        out.extend_from_slice(&[0u8; 4]); // inter-record gap
        out
    }
}

pub fn stream(records: &[RecordBuilder]) -> Vec<u8> {
    let mut out = Vec::new();
    for r in records {
        out.extend(r.build());
    }
    out
}
