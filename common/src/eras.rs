//! Era preset catalog
//!
//! Fixed, ordered table of "time travel" destinations. Each preset carries
//! the instruction text handed to the edit client.

/// A named transformation preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub instruction: &'static str,
    pub icon: &'static str,
}

/// All presets, in display order
pub const ERAS: &[EraPreset] = &[
    EraPreset {
        id: "vikings",
        name: "Viking Age",
        description: "Fierce warrior in a Nordic fjord.",
        instruction: "Transform this person into a fierce Viking warrior. Wearing leather armor and fur. \
                      Background is a dramatic Norwegian fjord with dragon ships. Cinematic lighting, photorealistic, 8k.",
        icon: "⚔️",
    },
    EraPreset {
        id: "1920s",
        name: "Roaring 20s",
        description: "A Gatsby-style party.",
        instruction: "Transform this person into a 1920s flapper or gentleman. Art Deco style, wearing elegant vintage evening wear. \
                      Background is a lavish jazz party with champagne towers. Sepia tone, vintage photography style.",
        icon: "🎷",
    },
    EraPreset {
        id: "cyberpunk",
        name: "Cyberpunk 2077",
        description: "Neon-soaked future.",
        instruction: "Transform this person into a cyberpunk character. Wearing high-tech tactical gear with glowing neon accents. \
                      Background is a rainy futuristic city street at night with holograms. Neon lighting, futuristic.",
        icon: "🤖",
    },
    EraPreset {
        id: "egypt",
        name: "Ancient Egypt",
        description: "Pharaohs and pyramids.",
        instruction: "Transform this person into an Ancient Egyptian royalty. Wearing gold jewelry, linen robes, and a headdress. \
                      Background is the Pyramids of Giza at sunset. Golden hour lighting, epic scale.",
        icon: "🐫",
    },
    EraPreset {
        id: "victorian",
        name: "Victorian London",
        description: "Steampunk and fog.",
        instruction: "Transform this person into a Victorian era detective or aristocrat. Wearing a top hat, coat, and suit. \
                      Background is a foggy cobblestone street in London with gas lamps. Moody atmosphere.",
        icon: "🎩",
    },
];

/// Looks up a preset by id
pub fn find_era(id: &str) -> Option<&'static EraPreset> {
    ERAS.iter().find(|era| era.id == id)
}

pub fn era_ids() -> Vec<&'static str> {
    ERAS.iter().map(|era| era.id).collect()
}
