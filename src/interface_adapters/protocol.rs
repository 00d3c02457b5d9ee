// Wire protocol DTOs and conversions for packets exchanged between the two peers.
// Every packet is a JSON object tagged by `type: "<namespace>/<action>"`.

use crate::domain::{EntityId, EntityKind, ObstacleVariant, Position, Size, SoundName};
use crate::domain::tuning::MapTuning;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every message one peer can send the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Packet {
    // A new entity the receiver should mirror (or own, see `is_remote`).
    #[serde(rename = "game/create-entity")]
    CreateEntity(CreateEntityPacket),
    #[serde(rename = "game/destroy-entity")]
    DestroyEntity(DestroyEntityPacket),
    // Host finished bootstrapping; the guest may start its match.
    #[serde(rename = "game/initialization-completed")]
    InitializationCompleted,
    // Full starting roster, replacing whatever the receiver had.
    #[serde(rename = "map/initialize")]
    MapInitialize(MapInitializePacket),
    #[serde(rename = "entity/update")]
    EntityUpdate(EntityUpdatePacket),
    #[serde(rename = "character/update")]
    CharacterUpdate(CharacterUpdatePacket),
    #[serde(rename = "entity/sprite/update")]
    SpriteUpdate(SpriteUpdatePacket),
    #[serde(rename = "sound/play")]
    SoundPlay(SoundPlayPacket),
}

impl Packet {
    /// Wire tag, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Packet::CreateEntity(_) => "game/create-entity",
            Packet::DestroyEntity(_) => "game/destroy-entity",
            Packet::InitializationCompleted => "game/initialization-completed",
            Packet::MapInitialize(_) => "map/initialize",
            Packet::EntityUpdate(_) => "entity/update",
            Packet::CharacterUpdate(_) => "character/update",
            Packet::SpriteUpdate(_) => "entity/sprite/update",
            Packet::SoundPlay(_) => "sound/play",
        }
    }

    /// Packets that address entities and must wait for the bootstrap barrier.
    pub fn needs_initialized_match(&self) -> bool {
        self.entity_id().is_some()
    }

    /// The entity an entity-addressed packet targets.
    pub fn entity_id(&self) -> Option<EntityId> {
        let id = match self {
            Packet::CreateEntity(p) => p.entity_id,
            Packet::DestroyEntity(p) => p.entity_id,
            Packet::EntityUpdate(p) => p.entity_id,
            Packet::CharacterUpdate(p) => p.entity_id,
            Packet::SpriteUpdate(p) => p.entity_id,
            Packet::InitializationCompleted | Packet::MapInitialize(_) | Packet::SoundPlay(_) => {
                return None;
            }
        };
        Some(EntityId::from_uuid(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionDto {
    pub x: f32,
    pub y: f32,
}

impl From<Position> for PositionDto {
    fn from(position: Position) -> Self {
        Self {
            x: position.x,
            y: position.y,
        }
    }
}

impl From<PositionDto> for Position {
    fn from(dto: PositionDto) -> Self {
        Position::new(dto.x, dto.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeDto {
    pub width: f32,
    pub height: f32,
}

impl From<Size> for SizeDto {
    fn from(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

impl From<SizeDto> for Size {
    fn from(dto: SizeDto) -> Self {
        Size::new(dto.width, dto.height)
    }
}

/// Construction payload shared by `game/create-entity` and `map/initialize` items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityPacket {
    pub entity_id: Uuid,
    pub initial_position: PositionDto,
    // Already flipped to the receiver's point of view.
    pub is_remote: bool,
    #[serde(flatten)]
    pub blueprint: BlueprintDto,
}

/// Per-type construction fields, tagged by `entityTypeName`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "entityTypeName",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum BlueprintDto {
    Obstacle {
        #[serde(default)]
        variant: ObstacleVariantDto,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<SizeDto>,
    },
    Character,
    Bullet,
    Boundary {
        size: SizeDto,
    },
    Background,
    PointLight,
}

impl BlueprintDto {
    pub fn into_kind(self, map: &MapTuning) -> EntityKind {
        match self {
            BlueprintDto::Obstacle { variant, size } => EntityKind::Obstacle {
                variant: variant.into(),
                size: size.map(Size::from).unwrap_or(map.default_obstacle_size),
            },
            BlueprintDto::Character => EntityKind::Character,
            BlueprintDto::Bullet => EntityKind::Bullet,
            BlueprintDto::Boundary { size } => EntityKind::Boundary { size: size.into() },
            BlueprintDto::Background => EntityKind::Background,
            BlueprintDto::PointLight => EntityKind::PointLight,
        }
    }
}

impl From<&EntityKind> for BlueprintDto {
    fn from(kind: &EntityKind) -> Self {
        match *kind {
            EntityKind::Obstacle { variant, size } => BlueprintDto::Obstacle {
                variant: variant.into(),
                size: Some(size.into()),
            },
            EntityKind::Character => BlueprintDto::Character,
            EntityKind::Bullet => BlueprintDto::Bullet,
            EntityKind::Boundary { size } => BlueprintDto::Boundary { size: size.into() },
            EntityKind::Background => BlueprintDto::Background,
            EntityKind::PointLight => BlueprintDto::PointLight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleVariantDto {
    #[default]
    Default,
    Unstable,
}

impl From<ObstacleVariant> for ObstacleVariantDto {
    fn from(variant: ObstacleVariant) -> Self {
        match variant {
            ObstacleVariant::Default => ObstacleVariantDto::Default,
            ObstacleVariant::Unstable => ObstacleVariantDto::Unstable,
        }
    }
}

impl From<ObstacleVariantDto> for ObstacleVariant {
    fn from(dto: ObstacleVariantDto) -> Self {
        match dto {
            ObstacleVariantDto::Default => ObstacleVariant::Default,
            ObstacleVariantDto::Unstable => ObstacleVariant::Unstable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestroyEntityPacket {
    pub entity_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapInitializePacket {
    pub entities: Vec<CreateEntityPacket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityUpdatePacket {
    pub entity_id: Uuid,
    pub new_entity_state: EntityStateDto,
}

/// Partial transform; absent fields are left unchanged by the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStateDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_position: Option<PositionDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_rotation_radians: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterUpdatePacket {
    pub entity_id: Uuid,
    pub new_entity_state: CharacterStateDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterStateDto {
    // Health removed since the last update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteUpdatePacket {
    pub entity_id: Uuid,
    pub new_sprite_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundPlayPacket {
    pub sound_name: SoundNameDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundNameDto {
    Jump,
    Land,
    Damage,
    BulletObstacleHit,
    Kill,
    Shot,
}

impl From<SoundName> for SoundNameDto {
    fn from(name: SoundName) -> Self {
        match name {
            SoundName::Jump => SoundNameDto::Jump,
            SoundName::Land => SoundNameDto::Land,
            SoundName::Damage => SoundNameDto::Damage,
            SoundName::BulletObstacleHit => SoundNameDto::BulletObstacleHit,
            SoundName::Kill => SoundNameDto::Kill,
            SoundName::Shot => SoundNameDto::Shot,
        }
    }
}

impl From<SoundNameDto> for SoundName {
    fn from(dto: SoundNameDto) -> Self {
        match dto {
            SoundNameDto::Jump => SoundName::Jump,
            SoundNameDto::Land => SoundName::Land,
            SoundNameDto::Damage => SoundName::Damage,
            SoundNameDto::BulletObstacleHit => SoundName::BulletObstacleHit,
            SoundNameDto::Kill => SoundName::Kill,
            SoundNameDto::Shot => SoundName::Shot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn when_entity_update_has_only_rotation_then_position_is_omitted() {
        let id = Uuid::new_v4();
        let packet = Packet::EntityUpdate(EntityUpdatePacket {
            entity_id: id,
            new_entity_state: EntityStateDto {
                new_position: None,
                new_rotation_radians: Some(0.5),
            },
        });

        let value = serde_json::to_value(&packet).expect("packet serializes");

        assert_eq!(
            value,
            json!({
                "type": "entity/update",
                "entityId": id.to_string(),
                "newEntityState": { "newRotationRadians": 0.5 }
            })
        );
    }

    #[test]
    fn when_obstacle_create_packet_is_parsed_then_blueprint_fields_are_read() {
        let id = Uuid::new_v4();
        let raw = json!({
            "type": "game/create-entity",
            "entityId": id.to_string(),
            "entityTypeName": "obstacle",
            "initialPosition": { "x": 10.0, "y": 20.0 },
            "isRemote": true,
            "variant": "unstable",
            "size": { "width": 320.0, "height": 30.0 }
        });

        let packet: Packet = serde_json::from_value(raw).expect("valid packet");

        let Packet::CreateEntity(create) = packet else {
            panic!("expected create packet");
        };
        assert_eq!(create.entity_id, id);
        assert!(create.is_remote);
        assert_eq!(
            create.blueprint,
            BlueprintDto::Obstacle {
                variant: ObstacleVariantDto::Unstable,
                size: Some(SizeDto {
                    width: 320.0,
                    height: 30.0
                }),
            }
        );
    }

    #[test]
    fn when_obstacle_packet_has_no_size_then_default_size_is_used() {
        let blueprint: BlueprintDto =
            serde_json::from_value(json!({ "entityTypeName": "obstacle" })).expect("valid");

        let kind = blueprint.into_kind(&MapTuning::default());

        assert_eq!(
            kind,
            EntityKind::Obstacle {
                variant: ObstacleVariant::Default,
                size: Size::new(300.0, 32.0),
            }
        );
    }

    #[test]
    fn when_initialization_completed_is_parsed_then_unit_variant_is_returned() {
        let packet: Packet =
            serde_json::from_str(r#"{"type":"game/initialization-completed"}"#).expect("valid");

        assert_eq!(packet, Packet::InitializationCompleted);
    }

    #[test]
    fn when_sound_name_is_camel_case_then_it_parses() {
        let packet: Packet =
            serde_json::from_str(r#"{"type":"sound/play","soundName":"bulletObstacleHit"}"#)
                .expect("valid");

        assert_eq!(
            packet,
            Packet::SoundPlay(SoundPlayPacket {
                sound_name: SoundNameDto::BulletObstacleHit
            })
        );
    }

    #[test]
    fn when_type_is_unknown_then_parsing_fails() {
        let result = serde_json::from_str::<Packet>(r#"{"type":"lobby/join"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn when_point_light_is_serialized_then_type_name_is_kebab_case() {
        let value = serde_json::to_value(BlueprintDto::PointLight).expect("serializes");

        assert_eq!(value, json!({ "entityTypeName": "point-light" }));
    }
}
