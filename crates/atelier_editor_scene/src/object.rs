// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene object definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for objects in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    /// Create a new random object ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of geometry an object represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Unit cube
    Box,
    /// UV sphere
    Sphere,
    /// Cylinder
    Cylinder,
    /// Cone
    Cone,
    /// Torus
    Torus,
    /// Flat plane
    Plane,
    /// Externally loaded geometry
    Model,
}

impl ObjectKind {
    /// Get the display name used for auto-naming
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Box => "Box",
            Self::Sphere => "Sphere",
            Self::Cylinder => "Cylinder",
            Self::Cone => "Cone",
            Self::Torus => "Torus",
            Self::Plane => "Plane",
            Self::Model => "Model",
        }
    }

    /// All primitive kinds (everything except `Model`)
    pub fn primitives() -> &'static [ObjectKind] {
        &[
            ObjectKind::Box,
            ObjectKind::Sphere,
            ObjectKind::Cylinder,
            ObjectKind::Cone,
            ObjectKind::Torus,
            ObjectKind::Plane,
        ]
    }
}

/// Transform data. Rotation is euler angles in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Rotation in euler angles (degrees)
    pub rotation: [f32; 3],
    /// Scale
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Transform {
    /// Return a copy moved by `offset`
    pub fn offset(mut self, offset: [f32; 3]) -> Self {
        for (p, o) in self.position.iter_mut().zip(offset) {
            *p += o;
        }
        self
    }
}

/// Shading model of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MaterialKind {
    /// Metalness/roughness PBR
    #[default]
    Standard,
    /// Extended PBR (clearcoat, transmission)
    Physical,
    /// Unlit
    Basic,
    /// Lambert diffuse
    Lambert,
    /// Blinn-Phong
    Phong,
}

/// Surface material of an object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    /// Shading model
    pub kind: MaterialKind,
    /// Base color (linear RGB)
    pub color: [f32; 3],
    /// Metalness (0..1)
    pub metalness: f32,
    /// Roughness (0..1)
    pub roughness: f32,
    /// Emissive color
    pub emissive: [f32; 3],
    /// Emissive intensity multiplier
    pub emissive_intensity: f32,
    /// Opacity (0..1), only honored when `transparent`
    pub opacity: f32,
    /// Whether the material is alpha blended
    pub transparent: bool,
    /// Render as wireframe
    pub wireframe: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Standard,
            color: [0.31, 0.56, 0.97],
            metalness: 0.1,
            roughness: 0.5,
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 1.0,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
        }
    }
}

/// File format of an external model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ModelFormat {
    /// glTF JSON
    Gltf,
    /// Binary glTF
    #[default]
    Glb,
    /// Wavefront OBJ
    Obj,
    /// Autodesk FBX
    Fbx,
    /// Stereolithography
    Stl,
}

impl ModelFormat {
    /// Guess the format from a file name or URI extension
    pub fn from_extension(uri: &str) -> Option<Self> {
        let ext = uri.rsplit('.').next()?.to_ascii_lowercase();
        match ext.as_str() {
            "gltf" => Some(Self::Gltf),
            "glb" => Some(Self::Glb),
            "obj" => Some(Self::Obj),
            "fbx" => Some(Self::Fbx),
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }
}

/// Reference to externally loaded geometry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelAsset {
    /// Where the geometry lives (URL, blob key, path)
    pub uri: String,
    /// Geometry format
    pub format: ModelFormat,
}

/// An object in the scene
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneObject {
    /// Stable unique ID
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// Geometry kind
    pub kind: ObjectKind,
    /// Local transform
    pub transform: Transform,
    /// Surface material
    pub material: Material,
    /// Whether the object is rendered
    pub visible: bool,
    /// Locked objects ignore gizmo edits
    pub locked: bool,
    /// Parent object (if any)
    #[serde(default)]
    pub parent: Option<ObjectId>,
    /// Geometry source for `ObjectKind::Model`
    #[serde(default)]
    pub asset: Option<ModelAsset>,
}

impl SceneObject {
    /// Create a new object with default transform and material
    pub fn new(kind: ObjectKind, name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            kind,
            transform: Transform::default(),
            material: Material::default(),
            visible: true,
            locked: false,
            parent: None,
            asset: None,
        }
    }

    /// Attach a model asset
    pub fn with_asset(mut self, asset: ModelAsset) -> Self {
        self.asset = Some(asset);
        self
    }

    /// Copy this object under a fresh ID
    pub fn clone_with_new_id(&self) -> Self {
        Self {
            id: ObjectId::new(),
            ..self.clone()
        }
    }
}

/// Partial update merged into an object by `SceneStore::update_object`.
///
/// There is no `parent` field; reparenting goes through
/// `SceneStore::set_parent`, which enforces acyclicity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPatch {
    /// New name
    pub name: Option<String>,
    /// Whole transform
    pub transform: Option<Transform>,
    /// Position only
    pub position: Option<[f32; 3]>,
    /// Rotation only (degrees)
    pub rotation: Option<[f32; 3]>,
    /// Scale only
    pub scale: Option<[f32; 3]>,
    /// Whole material
    pub material: Option<Material>,
    /// Visibility flag
    pub visible: Option<bool>,
    /// Lock flag
    pub locked: Option<bool>,
    /// Model asset
    pub asset: Option<ModelAsset>,
}

impl ObjectPatch {
    /// Patch that sets the position
    pub fn position(position: [f32; 3]) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    /// Patch that sets the whole transform
    pub fn transform(transform: Transform) -> Self {
        Self {
            transform: Some(transform),
            ..Default::default()
        }
    }

    /// Patch that renames the object
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Merge the patch into `object`. Component fields win over `transform`.
    pub fn apply(&self, object: &mut SceneObject) {
        if let Some(name) = &self.name {
            object.name.clone_from(name);
        }
        if let Some(transform) = self.transform {
            object.transform = transform;
        }
        if let Some(position) = self.position {
            object.transform.position = position;
        }
        if let Some(rotation) = self.rotation {
            object.transform.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            object.transform.scale = scale;
        }
        if let Some(material) = &self.material {
            object.material = material.clone();
        }
        if let Some(visible) = self.visible {
            object.visible = visible;
        }
        if let Some(locked) = self.locked {
            object.locked = locked;
        }
        if let Some(asset) = &self.asset {
            object.asset = Some(asset.clone());
        }
    }

    /// Check if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_merges_fields() {
        let mut object = SceneObject::new(ObjectKind::Box, "Box 1");
        let patch = ObjectPatch {
            position: Some([1.0, 2.0, 3.0]),
            visible: Some(false),
            ..Default::default()
        };
        patch.apply(&mut object);

        assert_eq!(object.transform.position, [1.0, 2.0, 3.0]);
        assert_eq!(object.transform.scale, [1.0, 1.0, 1.0]);
        assert!(!object.visible);
        assert_eq!(object.name, "Box 1");
    }

    #[test]
    fn test_model_format_from_extension() {
        assert_eq!(ModelFormat::from_extension("robot.GLB"), Some(ModelFormat::Glb));
        assert_eq!(ModelFormat::from_extension("blob:abc/teapot.obj"), Some(ModelFormat::Obj));
        assert_eq!(ModelFormat::from_extension("README"), None);
    }

    #[test]
    fn test_clone_with_new_id() {
        let object = SceneObject::new(ObjectKind::Sphere, "Sphere 1");
        let copy = object.clone_with_new_id();
        assert_ne!(copy.id, object.id);
        assert_eq!(copy.name, object.name);
    }
}
