//! The scene: objects, camera and editor state
//!
//! Objects live in a [`SlotMap`] so that ids stay valid across removals. A
//! separate order list keeps iteration in insertion order, which the HTML
//! export and the HUD depend on.

use rand::Rng;
use slotmap::SlotMap;
use thiserror::Error;

use crate::core::config::{CameraConfig, SceneConfig};
use crate::foundation::math::{constants, Vec3};
use crate::render::Color;

use super::camera::{Camera, CameraMove};
use super::game_object::{GameObject, ObjectKind};

slotmap::new_key_type! {
    /// Stable handle to an object in a [`Scene`]
    pub struct ObjectId;
}

/// Whether input edits the scene or only views it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditorMode {
    /// View and select only
    #[default]
    Play,
    /// Keypresses and clicks create objects
    Edit,
}

impl EditorMode {
    /// Display name used by the HUD and the HTML panel
    pub fn label(self) -> &'static str {
        match self {
            Self::Play => "PLAY MODE",
            Self::Edit => "EDIT MODE",
        }
    }
}

/// Scene errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// An edit operation was requested in play mode
    #[error("Scene edits require edit mode")]
    NotInEditMode,

    /// The id does not refer to a live object
    #[error("Unknown object: {0:?}")]
    UnknownObject(ObjectId),
}

/// Color of platforms created at runtime
pub const WOVEN_PLATFORM_COLOR: Color = Color::rgb(0xCD as f32 / 255.0, 0x85 as f32 / 255.0, 0x3F as f32 / 255.0);

/// A collection of objects viewed through one camera
pub struct Scene {
    name: String,
    objects: SlotMap<ObjectId, GameObject>,
    order: Vec<ObjectId>,
    /// The scene camera
    pub camera: Camera,
    mode: EditorMode,
    selected: Option<ObjectId>,
    woven_counter: u32,
    spin_rate: f32,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>, camera: Camera) -> Self {
        let defaults = SceneConfig::default();
        Self {
            name: name.into(),
            objects: SlotMap::with_key(),
            order: Vec::new(),
            camera,
            mode: EditorMode::Play,
            selected: None,
            woven_counter: defaults.first_woven_index,
            spin_rate: defaults.planet_spin_rate,
        }
    }

    /// Build the sandbox scene: one planet, a ring of platforms and a row of crystals
    pub fn default_sandbox(scene: &SceneConfig, camera: &CameraConfig) -> Self {
        let mut world = Self::new(scene.name.clone(), Camera::from_config(camera));
        world.spin_rate = scene.planet_spin_rate;
        world.woven_counter = scene.first_woven_index;

        world.spawn(GameObject::new(scene.planet_name.clone(), ObjectKind::Planet, Vec3::zeros()));

        for i in 0..scene.platform_count {
            let theta = constants::TAU * i as f32 / scene.platform_count as f32;
            let position = Vec3::new(
                theta.cos() * scene.platform_ring_radius,
                theta.sin() * scene.platform_height_amplitude,
                theta.sin() * scene.platform_ring_radius,
            );
            world.spawn(GameObject::new(format!("Platform_{i}"), ObjectKind::Platform, position));
        }

        let center = (scene.crystal_count.saturating_sub(1)) as f32 / 2.0;
        for i in 0..scene.crystal_count {
            let offset = i as f32 - center;
            let position = Vec3::new(
                scene.crystal_spacing.x * offset,
                scene.crystal_height,
                scene.crystal_spacing.y * offset,
            );
            world.spawn(GameObject::new(format!("Crystal_{i}"), ObjectKind::Collectible, position));
        }

        log::info!("Built scene '{}' with {} objects", world.name, world.len());
        world
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an object, returning its id
    pub fn spawn(&mut self, object: GameObject) -> ObjectId {
        let id = self.objects.insert(object);
        self.order.push(id);
        id
    }

    /// Remove an object, returning it
    pub fn remove(&mut self, id: ObjectId) -> Result<GameObject, SceneError> {
        let object = self.objects.remove(id).ok_or(SceneError::UnknownObject(id))?;
        self.order.retain(|other| *other != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(object)
    }

    /// Keep only the objects matching `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&GameObject) -> bool) {
        let removed: Vec<ObjectId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.objects.get(*id).is_some_and(|object| !keep(object)))
            .collect();
        for id in removed {
            // ids come from the live order list
            let _ = self.remove(id);
        }
    }

    /// Look up an object
    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(id)
    }

    /// Look up an object mutably
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    /// First object with the given name
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.objects.get(*id).is_some_and(|object| object.name() == name))
    }

    /// Objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &GameObject)> + '_ {
        self.order.iter().filter_map(move |id| self.objects.get(*id).map(|object| (*id, object)))
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of objects of one kind
    pub fn count_kind(&self, kind: ObjectKind) -> usize {
        self.objects.values().filter(|object| object.kind() == kind).count()
    }

    /// Current editor mode
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Switch between play and edit mode, returning the new mode
    pub fn toggle_mode(&mut self) -> EditorMode {
        self.mode = match self.mode {
            EditorMode::Play => EditorMode::Edit,
            EditorMode::Edit => EditorMode::Play,
        };
        log::info!("Switched to {}", self.mode.label());
        self.mode
    }

    /// Counter used for the next woven platform name
    pub fn woven_counter(&self) -> u32 {
        self.woven_counter
    }

    /// Name the next woven platform will get
    pub fn next_woven_name(&self) -> String {
        format!("Woven_{}", self.woven_counter)
    }

    /// Weave a platform at a random position inside the configured range
    pub fn weave_platform<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &SceneConfig) -> Result<ObjectId, SceneError> {
        if self.mode != EditorMode::Edit {
            return Err(SceneError::NotInEditMode);
        }
        let position = Vec3::new(
            rng.gen_range(-config.weave_extent..config.weave_extent),
            rng.gen_range(config.weave_height_min..config.weave_height_min + config.weave_height_range),
            rng.gen_range(-config.weave_extent..config.weave_extent),
        );
        self.weave_platform_at(position)
    }

    /// Weave a platform at an exact position
    pub fn weave_platform_at(&mut self, position: Vec3) -> Result<ObjectId, SceneError> {
        if self.mode != EditorMode::Edit {
            return Err(SceneError::NotInEditMode);
        }
        let name = self.next_woven_name();
        self.woven_counter += 1;
        log::info!("Wove {} at ({:.1}, {:.1}, {:.1})", name, position.x, position.y, position.z);
        Ok(self.spawn(GameObject::with_color(name, ObjectKind::Platform, position, WOVEN_PLATFORM_COLOR)))
    }

    /// Select an object
    pub fn select(&mut self, id: ObjectId) -> Result<(), SceneError> {
        if !self.objects.contains_key(id) {
            return Err(SceneError::UnknownObject(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    /// Drop the current selection
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Currently selected object
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Move the camera by `amount`
    pub fn move_camera(&mut self, movement: CameraMove, amount: f32) {
        self.camera.step(movement, amount);
    }

    /// Planet spin rate in degrees per second
    pub fn spin_rate(&self) -> f32 {
        self.spin_rate
    }

    /// Advance all objects by one frame
    pub fn update(&mut self, delta_time: f32) {
        let spin_rate = self.spin_rate;
        for object in self.objects.values_mut() {
            object.update(delta_time, spin_rate);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::default_sandbox(&SceneConfig::default(), &CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_default_sandbox_layout() {
        let scene = Scene::default();

        assert_eq!(scene.len(), 11);
        assert_eq!(scene.count_kind(ObjectKind::Planet), 1);
        assert_eq!(scene.count_kind(ObjectKind::Platform), 6);
        assert_eq!(scene.count_kind(ObjectKind::Collectible), 4);

        let names: Vec<&str> = scene.iter().map(|(_, object)| object.name()).collect();
        assert_eq!(names[0], "Earth");
        assert_eq!(names[1], "Platform_0");
        assert_eq!(names[10], "Crystal_3");

        let platform_1 = scene.get(scene.find_by_name("Platform_1").expect("platform")).expect("live");
        let theta = constants::TAU / 6.0;
        assert_relative_eq!(platform_1.position(), Vec3::new(theta.cos() * 8.0, theta.sin() * 2.0, theta.sin() * 8.0), epsilon = 1e-5);

        let crystal_0 = scene.get(scene.find_by_name("Crystal_0").expect("crystal")).expect("live");
        assert_relative_eq!(crystal_0.position(), Vec3::new(-4.5, 4.0, -3.0), epsilon = 1e-5);
        let crystal_3 = scene.get(scene.find_by_name("Crystal_3").expect("crystal")).expect("live");
        assert_relative_eq!(crystal_3.position(), Vec3::new(4.5, 4.0, 3.0), epsilon = 1e-5);
    }

    #[test]
    fn test_weave_refused_in_play_mode() {
        let mut scene = Scene::default();
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(scene.weave_platform(&mut rng, &SceneConfig::default()), Err(SceneError::NotInEditMode));
        assert_eq!(scene.len(), 11);
    }

    #[test]
    fn test_woven_names_increment_from_six() {
        let mut scene = Scene::default();
        let config = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        scene.toggle_mode();

        let first = scene.weave_platform(&mut rng, &config).expect("weave");
        let second = scene.weave_platform(&mut rng, &config).expect("weave");

        let first = scene.get(first).expect("live");
        assert_eq!(first.name(), "Woven_6");
        assert_eq!(first.color(), WOVEN_PLATFORM_COLOR);
        assert_eq!(scene.get(second).expect("live").name(), "Woven_7");

        for (_, object) in scene.iter().filter(|(_, o)| o.name().starts_with("Woven_")) {
            let p = object.position();
            assert!((-10.0..10.0).contains(&p.x));
            assert!((2.0..10.0).contains(&p.y));
            assert!((-10.0..10.0).contains(&p.z));
        }
    }

    #[test]
    fn test_remove_clears_selection_and_order() {
        let mut scene = Scene::default();
        let earth = scene.find_by_name("Earth").expect("earth");
        scene.select(earth).expect("select");

        let removed = scene.remove(earth).expect("remove");
        assert_eq!(removed.name(), "Earth");
        assert_eq!(scene.selected(), None);
        assert_eq!(scene.iter().count(), 10);
        assert_eq!(scene.remove(earth).err(), Some(SceneError::UnknownObject(earth)));
        assert_eq!(scene.select(earth), Err(SceneError::UnknownObject(earth)));
    }

    #[test]
    fn test_retain_collects_crystals() {
        let mut scene = Scene::default();
        scene.retain(|object| object.kind() != ObjectKind::Collectible);
        assert_eq!(scene.count_kind(ObjectKind::Collectible), 0);
        assert_eq!(scene.len(), 7);
    }

    #[test]
    fn test_update_spins_planet() {
        let mut scene = Scene::default();
        scene.update(0.5);
        let earth = scene.get(scene.find_by_name("Earth").expect("earth")).expect("live");
        assert_relative_eq!(earth.rotation_y(), 25.0, epsilon = 1e-4);
    }
}
