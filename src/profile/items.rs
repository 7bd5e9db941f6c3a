use crate::{
    errors::{Error, ResultExt},
    package::bounded_vec,
    version::Gate,
    Package, RawString, Vector2i,
};

#[cfg(feature = "derive")]
use serde::Serialize;

/// An item held in a player's inventory
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct Item {
    pub name: RawString,
    pub stack: i32,
    pub durability: f32,
    pub position: Vector2i,
    pub equipped: bool,
    pub quality: i32,
    pub variant: i32,
    pub crafter_id: i64,
    pub crafter_name: RawString,
}

impl Default for Item {
    fn default() -> Self {
        Item {
            name: RawString::default(),
            stack: 0,
            durability: 0.0,
            position: Vector2i::default(),
            equipped: false,
            quality: 1,
            variant: 0,
            crafter_id: 0,
            crafter_name: RawString::default(),
        }
    }
}

/// A food the player is currently digesting
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct Food {
    pub name: RawString,
    pub health: f32,
    pub stamina: f32,
}

/// Progress in a single skill
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct Skill {
    #[cfg_attr(feature = "derive", serde(rename = "type"))]
    pub skill_type: i32,
    pub level: f32,
    pub accumulator: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Name,
    Stack,
    Durability,
    Position,
    Equipped,
    Quality,
    Variant,
    Crafter,
}

impl ItemField {
    pub fn name(&self) -> &'static str {
        match self {
            ItemField::Name => "name",
            ItemField::Stack => "stack",
            ItemField::Durability => "durability",
            ItemField::Position => "position",
            ItemField::Equipped => "equipped",
            ItemField::Quality => "quality",
            ItemField::Variant => "variant",
            ItemField::Crafter => "crafter",
        }
    }
}

/// Field presence of an inventory item by the inventory's own version
pub const ITEM_LAYOUT: &[(ItemField, Gate)] = &[
    (ItemField::Name, Gate::Always),
    (ItemField::Stack, Gate::Always),
    (ItemField::Durability, Gate::Always),
    (ItemField::Position, Gate::Always),
    (ItemField::Equipped, Gate::Always),
    (ItemField::Quality, Gate::Since(101)),
    (ItemField::Variant, Gate::Since(102)),
    (ItemField::Crafter, Gate::Since(103)),
];

/// Presence of the stamina value of a food by player data version
pub const FOOD_STAMINA: Gate = Gate::Since(16);

/// Presence of the accumulator of a skill by the skill list's own version
pub const SKILL_ACCUMULATOR: Gate = Gate::Since(2);

// minimum encoded sizes used to bound element counts
const ITEM_MIN_SIZE: usize = 1 + 4 + 4 + 8 + 1;
const SKILL_MIN_SIZE: usize = 4 + 4;

impl Item {
    fn decode(package: &mut Package, version: i32) -> Result<Item, Error> {
        let mut item = Item::default();
        for &(field, gate) in ITEM_LAYOUT {
            if gate.admits(version) {
                item.read_field(package, field).context(field.name())?;
            }
        }
        Ok(item)
    }

    fn read_field(&mut self, package: &mut Package, field: ItemField) -> Result<(), Error> {
        match field {
            ItemField::Name => self.name = package.read_string()?,
            ItemField::Stack => self.stack = package.read_i32()?,
            ItemField::Durability => self.durability = package.read_f32()?,
            ItemField::Position => self.position = package.read_vector2i()?,
            ItemField::Equipped => self.equipped = package.read_bool()?,
            ItemField::Quality => self.quality = package.read_i32()?,
            ItemField::Variant => self.variant = package.read_i32()?,
            ItemField::Crafter => {
                self.crafter_id = package.read_i64()?;
                self.crafter_name = package.read_string()?;
            }
        }
        Ok(())
    }
}

/// Decode an inventory: its own version, then a counted list of items
pub(crate) fn read_inventory(package: &mut Package) -> Result<Vec<Item>, Error> {
    let version = package.read_i32().context("version")?;
    let count = package.read_count(ITEM_MIN_SIZE).context("count")?;
    let mut items = bounded_vec(count, package.remaining());
    for i in 0..count {
        let item = Item::decode(package, version).with_context(|| format!("item #{}", i))?;
        items.push(item);
    }
    Ok(items)
}

/// Decode a food entry, laid out according to the player data version
pub(crate) fn read_food(package: &mut Package, player_version: i32) -> Result<Food, Error> {
    let mut food = Food {
        name: package.read_string().context("name")?,
        health: package.read_f32().context("health")?,
        stamina: 0.0,
    };

    if FOOD_STAMINA.admits(player_version) {
        food.stamina = package.read_f32().context("stamina")?;
    }

    Ok(food)
}

/// Decode a skill list: its own version, then a counted list of skills
pub(crate) fn read_skills(package: &mut Package) -> Result<Vec<Skill>, Error> {
    let version = package.read_i32().context("version")?;
    let count = package.read_count(SKILL_MIN_SIZE).context("count")?;
    let mut skills = bounded_vec(count, package.remaining());
    for i in 0..count {
        let skill = read_skill(package, version).with_context(|| format!("skill #{}", i))?;
        skills.push(skill);
    }
    Ok(skills)
}

fn read_skill(package: &mut Package, version: i32) -> Result<Skill, Error> {
    let mut skill = Skill {
        skill_type: package.read_i32().context("type")?,
        level: package.read_f32().context("level")?,
        accumulator: 0.0,
    };

    if SKILL_ACCUMULATOR.admits(version) {
        skill.accumulator = package.read_f32().context("accumulator")?;
    }

    Ok(skill)
}
