//! Boundary to the 3D viewer
//!
//! The animation core never renders. It pushes camera, rotation, material
//! colors, and effect toggles through [`SceneHost`], and resolves the named
//! objects it drives exactly once, when loading completes.

use sheen_core::{CameraPose, LoadError, Vec3};
use sheen_paint::Color;
use smallvec::SmallVec;

/// Opaque reference to a scene object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub u32);

/// What the showcase needs from the viewer
pub trait SceneHost {
    /// Current pose of the active camera, `None` if the scene has no camera
    fn camera_pose(&self) -> Option<CameraPose>;

    /// Push the animated pose to the camera
    fn sync_camera(&mut self, pose: &CameraPose);

    /// Look up an object by name
    fn find_object(&self, name: &str) -> Option<ObjectHandle>;

    /// Set an object's XYZ Euler rotation in radians
    fn set_rotation(&mut self, object: ObjectHandle, rotation: Vec3);

    /// Set an object's material color (linear space)
    fn set_material_color(&mut self, object: ObjectHandle, color: Color);

    /// Set the background color (linear space)
    fn set_background(&mut self, color: Color);

    /// Hand the camera to the orbit controller, or take it back
    fn set_orbit_control(&mut self, enabled: bool, auto_rotate: bool);

    fn set_depth_of_field(&mut self, enabled: bool);
}

/// Object names the showcase animates
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNames {
    /// Object whose rotation is animated
    pub ring: String,
    /// Objects per material group, in palette order
    pub groups: Vec<Vec<String>>,
}

/// Resolved objects, validated once at load
#[derive(Clone, Debug)]
pub struct SceneHandles {
    pub ring: ObjectHandle,
    /// Objects per material group, in palette order
    pub groups: Vec<SmallVec<[ObjectHandle; 8]>>,
}

impl SceneHandles {
    /// Resolve every name, failing on the first missing camera or object
    pub fn validate(host: &dyn SceneHost, names: &SceneNames) -> Result<Self, LoadError> {
        if host.camera_pose().is_none() {
            return Err(LoadError::MissingCamera);
        }
        let find = |name: &str| {
            host.find_object(name)
                .ok_or_else(|| LoadError::MissingObject(name.to_string()))
        };

        let ring = find(names.ring.as_str())?;
        let groups = names
            .groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|name| find(name.as_str()))
                    .collect::<Result<SmallVec<[ObjectHandle; 8]>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            groups = groups.len(),
            objects = groups.iter().map(|g| g.len()).sum::<usize>(),
            "scene handles resolved"
        );
        Ok(Self { ring, groups })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryScene;

    fn names() -> SceneNames {
        SceneNames {
            ring: "ring".to_string(),
            groups: vec![vec!["band".to_string()], vec!["gem1".to_string(), "gem2".to_string()]],
        }
    }

    #[test]
    fn test_validate_resolves_all() {
        let scene = MemoryScene::new()
            .with_camera(CameraPose::default())
            .with_objects(["ring", "band", "gem1", "gem2"]);
        let handles = SceneHandles::validate(&scene, &names()).unwrap();
        assert_eq!(handles.groups.len(), 2);
        assert_eq!(handles.groups[1].len(), 2);
    }

    #[test]
    fn test_missing_camera() {
        let scene = MemoryScene::new().with_objects(["ring", "band", "gem1", "gem2"]);
        assert_eq!(
            SceneHandles::validate(&scene, &names()).unwrap_err(),
            LoadError::MissingCamera
        );
    }

    #[test]
    fn test_missing_object_named() {
        let scene = MemoryScene::new()
            .with_camera(CameraPose::default())
            .with_objects(["ring", "band", "gem1"]);
        assert_eq!(
            SceneHandles::validate(&scene, &names()).unwrap_err(),
            LoadError::MissingObject("gem2".to_string())
        );
    }
}
