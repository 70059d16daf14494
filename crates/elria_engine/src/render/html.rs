//! Self-contained HTML view of a scene
//!
//! The exported page carries the scene objects as JSON and a small script that
//! re-implements the projection, camera keys and platform weaving in the
//! browser. Nothing is fetched at runtime.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::config::{ApplicationConfig, ProjectionConfig, SceneConfig, ViewportConfig};
use crate::input::KeyBindings;
use crate::scene::Scene;

use super::{escape_xml, RenderError, RenderResult};

/// File name used when no path is given
pub const DEFAULT_HTML_FILE: &str = "EpochOfElriaEngine.html";

/// One object as embedded in the page
#[derive(Debug, Serialize)]
struct HtmlObject<'a> {
    name: &'a str,
    x: f32,
    y: f32,
    z: f32,
    #[serde(rename = "type")]
    kind: &'static str,
    color: String,
    icon: &'static str,
}

/// Camera and tuning data read by the page script
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HtmlSettings {
    camera: [f32; 3],
    home: [f32; 3],
    step: f32,
    focal_scale: f32,
    distance_offset: f32,
    min_distance: f32,
    weave_extent: f32,
    weave_height_min: f32,
    weave_height_range: f32,
    woven_counter: u32,
    edit_mode: bool,
    keys: std::collections::BTreeMap<String, &'static str>,
}

/// Renders scenes into standalone HTML documents
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    viewport: ViewportConfig,
    projection: ProjectionConfig,
    weave: SceneConfig,
    step: f32,
    bindings: KeyBindings,
}

impl HtmlExporter {
    /// Create an exporter from the application configuration
    pub fn new(config: &ApplicationConfig) -> Self {
        Self {
            viewport: config.viewport.clone(),
            projection: config.projection.clone(),
            weave: config.scene.clone(),
            step: config.camera.move_step,
            bindings: KeyBindings::default(),
        }
    }

    /// Use custom key bindings in the page (builder style)
    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Render `scene` into a complete HTML document
    pub fn render(&self, scene: &Scene) -> RenderResult<String> {
        let objects: Vec<HtmlObject<'_>> = scene
            .iter()
            .map(|(_, object)| {
                let position = object.position();
                HtmlObject {
                    name: object.name(),
                    x: position.x,
                    y: position.y,
                    z: position.z,
                    kind: object.kind().as_str(),
                    color: object.color().to_hex(),
                    icon: object.kind().icon(),
                }
            })
            .collect();

        let camera = scene.camera.position;
        let home = scene.camera.home_position();
        let settings = HtmlSettings {
            camera: [camera.x, camera.y, camera.z],
            home: [home.x, home.y, home.z],
            step: self.step,
            focal_scale: self.projection.focal_scale,
            distance_offset: self.projection.distance_offset,
            min_distance: self.projection.min_distance,
            weave_extent: self.weave.weave_extent,
            weave_height_min: self.weave.weave_height_min,
            weave_height_range: self.weave.weave_height_range,
            woven_counter: scene.woven_counter(),
            edit_mode: scene.mode() == crate::scene::EditorMode::Edit,
            keys: self
                .bindings
                .iter()
                .map(|(key, command)| (key.dom_key(), command.action_name()))
                .collect(),
        };

        let objects_json = script_json(&objects)?;
        let settings_json = script_json(&settings)?;
        let title = escape_xml(&self.viewport.title);

        let placeholders = [
            ("__TITLE__", title),
            ("__WIDTH__", self.viewport.width.to_string()),
            ("__HEIGHT__", self.viewport.height.to_string()),
            ("__SCENE_NAME__", escape_xml(scene.name())),
            ("__MODE__", scene.mode().label().to_string()),
            ("__CAMERA__", format!("{:.0}, {:.0}, {:.0}", camera.x, camera.y, camera.z)),
            ("__OBJECT_COUNT__", scene.len().to_string()),
            ("__CONTROLS__", self.controls_help()),
            ("__SETTINGS__", settings_json),
            ("__OBJECTS__", objects_json),
        ];
        Ok(fill_template(PAGE_TEMPLATE, &placeholders))
    }

    /// Render `scene` and write it to `path`, returning the path written
    pub fn write_to(&self, scene: &Scene, path: impl AsRef<Path>) -> RenderResult<PathBuf> {
        let path = path.as_ref();
        std::fs::write(path, self.render(scene)?)?;
        log::info!("Wrote {} ({} objects)", path.display(), scene.len());
        Ok(path.to_path_buf())
    }

    /// Open a written document with the system's default browser
    pub fn open_in_browser(path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let target = absolute.to_string_lossy();
        webbrowser::open(&target).map_err(|e| RenderError::Browser(format!("{target}: {e}")))
    }

    fn controls_help(&self) -> String {
        use crate::input::SceneCommand;
        use crate::scene::CameraMove;

        let key = |command: SceneCommand| {
            self.bindings
                .key_for(command)
                .map_or_else(|| "-".to_string(), |key| format!("{key:?}"))
        };
        let moves = [CameraMove::Forward, CameraMove::Left, CameraMove::Backward, CameraMove::Right]
            .map(|movement| key(SceneCommand::MoveCamera(movement)))
            .join("/");

        format!(
            "<div>{moves} - Move Camera</div>\n\
             <div>{} Up | {} Down</div>\n\
             <div>{} - Edit Mode | {} - Create Platform</div>\n\
             <div>{} - Reset Camera</div>",
            key(SceneCommand::MoveCamera(CameraMove::Up)),
            key(SceneCommand::MoveCamera(CameraMove::Down)),
            key(SceneCommand::ToggleEditMode),
            key(SceneCommand::WeavePlatform),
            key(SceneCommand::ResetCamera),
        )
    }
}

/// JSON safe to place inside a `<script>` element
fn script_json<T: Serialize>(value: &T) -> RenderResult<String> {
    let json = serde_json::to_string(value).map_err(std::io::Error::from)?;
    Ok(json.replace("</", "<\\/"))
}

/// Substitute every `__NAME__` placeholder in one pass
///
/// Substituted text is never scanned again, so values may contain placeholder names.
fn fill_template(template: &str, placeholders: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("__") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match placeholders.iter().find(|(name, _)| tail.starts_with(name)) {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len()..];
            }
            None => {
                out.push('_');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>🌍 __TITLE__ 🌍</title>
    <style>
        body {
            margin: 0;
            padding: 0;
            background: linear-gradient(to bottom, #000428, #004e92);
            font-family: 'Courier New', monospace;
            color: white;
            overflow: hidden;
        }
        #gameContainer { position: relative; width: 100vw; height: 100vh; }
        #canvas3d {
            position: absolute;
            top: 0;
            left: 0;
            background: radial-gradient(circle, #001122 0%, #000000 100%);
        }
        .panel {
            position: absolute;
            z-index: 100;
            background: rgba(0, 0, 0, 0.7);
            padding: 15px;
            border-radius: 10px;
        }
        #ui { top: 20px; left: 20px; padding: 20px; border: 2px solid #4A90E2; }
        #controls { bottom: 20px; left: 20px; border: 2px solid #FFD700; }
        #sceneInfo { top: 20px; right: 20px; border: 2px solid #8B4513; }
        .title { font-size: 24px; font-weight: bold; margin-bottom: 10px; text-align: center; color: #4A90E2; }
        .mode { font-size: 18px; margin-bottom: 10px; color: #FFD700; }
        .edit-mode { color: #FF6B35; }
        .object {
            position: absolute;
            border-radius: 50%;
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
            font-size: 20px;
            font-weight: bold;
            text-shadow: 2px 2px 4px rgba(0,0,0,0.8);
            transition: all 0.3s ease;
            cursor: pointer;
        }
        .object:hover { transform: scale(1.2); box-shadow: 0 0 20px rgba(255, 255, 255, 0.5); }
        .planet { border: 3px solid #87CEEB; animation: rotate 10s linear infinite; }
        .platform { border: 2px solid #D2691E; border-radius: 10px; }
        .collectible { border: 2px solid #FFFF00; animation: sparkle 2s infinite; }
        @keyframes sparkle {
            0%, 100% { box-shadow: 0 0 10px #FFD700; }
            50% { box-shadow: 0 0 30px #FFFF00, 0 0 40px #FFD700; }
        }
        @keyframes rotate { from { transform: rotate(0deg); } to { transform: rotate(360deg); } }
        button {
            background: #4A90E2;
            color: white;
            border: none;
            padding: 10px 15px;
            margin: 5px;
            border-radius: 5px;
            cursor: pointer;
            font-family: inherit;
        }
        button:hover { background: #357ABD; }
        #notification {
            position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%);
            background: rgba(0,0,0,0.9); color: #FFD700; padding: 20px;
            border-radius: 10px; border: 2px solid #FFD700; z-index: 1000;
            font-size: 18px; text-align: center; white-space: pre-line; display: none;
        }
    </style>
</head>
<body>
    <div id="gameContainer">
        <canvas id="canvas3d" width="__WIDTH__" height="__HEIGHT__"></canvas>

        <div id="ui" class="panel">
            <div class="title">🌍 __TITLE__</div>
            <div class="mode" id="modeDisplay">__MODE__</div>
            <div>📷 Camera: (<span id="cameraPos">__CAMERA__</span>)</div>
        </div>

        <div id="controls" class="panel">
            <div style="margin-bottom: 10px;"><strong>🎮 CONTROLS:</strong></div>
            __CONTROLS__
            <br>
            <button onclick="engine.dispatch('toggleEdit')">Toggle Edit Mode</button>
            <button onclick="engine.dispatch('weave')">Create Platform</button>
            <button onclick="engine.dispatch('reset')">Reset Camera</button>
        </div>

        <div id="sceneInfo" class="panel">
            <div><strong>🎬 SCENE: __SCENE_NAME__</strong></div>
            <div>Objects: <span id="objectCount">__OBJECT_COUNT__</span></div>
        </div>

        <div id="gameObjects"></div>
        <div id="notification"></div>
    </div>

    <script>
        class ElriaView {
            constructor(objects, settings) {
                this.objects = objects;
                this.settings = settings;
                this.camera = {x: settings.camera[0], y: settings.camera[1], z: settings.camera[2]};
                this.editMode = settings.editMode;
                this.wovenCounter = settings.wovenCounter;
                this.running = true;
                document.addEventListener('keydown', (e) => this.onKey(e));
                this.updateMode();
                this.render();
                setInterval(() => { if (this.running) this.render(); }, 100);
            }

            onKey(e) {
                const action = this.settings.keys[e.key.toLowerCase()];
                if (action) {
                    e.preventDefault();
                    this.dispatch(action);
                }
            }

            dispatch(action) {
                const step = this.settings.step;
                switch (action) {
                    case 'forward': this.camera.z -= step; break;
                    case 'backward': this.camera.z += step; break;
                    case 'left': this.camera.x -= step; break;
                    case 'right': this.camera.x += step; break;
                    case 'up': this.camera.y += step; break;
                    case 'down': this.camera.y -= step; break;
                    case 'toggleEdit': this.editMode = !this.editMode; this.updateMode(); break;
                    case 'weave': this.weave(); break;
                    case 'reset': this.resetCamera(); break;
                    case 'quit': this.running = false; this.notify('Engine stopped'); break;
                }
                this.updateCamera();
                this.render();
            }

            updateMode() {
                const display = document.getElementById('modeDisplay');
                display.textContent = this.editMode ? 'EDIT MODE' : 'PLAY MODE';
                display.className = this.editMode ? 'mode edit-mode' : 'mode';
            }

            weave() {
                if (!this.editMode) {
                    this.notify('Switch to edit mode to weave platforms');
                    return;
                }
                const s = this.settings;
                this.objects.push({
                    name: `Woven_${this.wovenCounter++}`,
                    x: (Math.random() * 2 - 1) * s.weaveExtent,
                    y: s.weaveHeightMin + Math.random() * s.weaveHeightRange,
                    z: (Math.random() * 2 - 1) * s.weaveExtent,
                    type: 'platform',
                    color: '#CD853F',
                    icon: '🟫'
                });
                document.getElementById('objectCount').textContent = this.objects.length;
                this.notify('✨ Reality Weaving Activated! New platform created!');
            }

            resetCamera() {
                const home = this.settings.home;
                this.camera = {x: home[0], y: home[1], z: home[2]};
            }

            updateCamera() {
                document.getElementById('cameraPos').textContent =
                    `${Math.round(this.camera.x)}, ${Math.round(this.camera.y)}, ${Math.round(this.camera.z)}`;
            }

            notify(message) {
                const box = document.getElementById('notification');
                box.textContent = message;
                box.style.display = 'block';
                clearTimeout(this.notifyTimer);
                this.notifyTimer = setTimeout(() => { box.style.display = 'none'; }, 3000);
            }

            render() {
                const s = this.settings;
                const container = document.getElementById('gameObjects');
                container.innerHTML = '';
                const centerX = window.innerWidth / 2;
                const centerY = window.innerHeight / 2;
                const sizes = {planet: 60, platform: 30, collectible: 25};

                this.objects.forEach(obj => {
                    const planar = Math.hypot(obj.x - this.camera.x, obj.z - this.camera.z);
                    const distance = Math.max(planar, s.minDistance);
                    const scale = s.focalScale / (distance + s.distanceOffset);
                    const screenX = centerX + (obj.x - this.camera.x) * scale;
                    const screenY = centerY - (obj.y - this.camera.y) * scale;
                    const size = sizes[obj.type] * scale;

                    const element = document.createElement('div');
                    element.className = `object ${obj.type}`;
                    element.style.cssText = `
                        left: ${screenX - size / 2}px;
                        top: ${screenY - size / 2}px;
                        width: ${size}px;
                        height: ${size}px;
                        background: ${obj.color};
                        z-index: ${Math.round(1000 - distance)};
                    `;
                    element.textContent = obj.icon;
                    const label = document.createElement('small');
                    label.textContent = obj.name;
                    element.appendChild(label);
                    element.title = `${obj.name} at (${Math.round(obj.x)}, ${Math.round(obj.y)}, ${Math.round(obj.z)})`;
                    container.appendChild(element);
                });
            }
        }

        const engine = new ElriaView(__OBJECTS__, __SETTINGS__);
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::{GameObject, ObjectKind};

    fn exporter() -> HtmlExporter {
        HtmlExporter::new(&ApplicationConfig::default())
    }

    #[test]
    fn test_document_embeds_scene() {
        let scene = Scene::default();
        let html = exporter().render(&scene).expect("render");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("SCENE: Earth Sphere Sandbox"));
        assert!(html.contains("<span id=\"objectCount\">11</span>"));
        assert!(html.contains("\"name\":\"Earth\""));
        assert!(html.contains("\"type\":\"planet\""));
        assert!(html.contains("\"color\":\"#FFD700\""));
        assert!(html.contains("\"wovenCounter\":6"));
        assert!(html.contains("\"e\":\"toggleEdit\""));
        assert!(html.contains("\"c\":\"down\""));
        assert!(html.contains("\" \":\"reset\""));
        assert!(!html.contains("__"), "unreplaced placeholder");
    }

    #[test]
    fn test_script_close_is_escaped() {
        let mut scene = Scene::default();
        scene.spawn(GameObject::new("</script><b>", ObjectKind::Platform, Vec3::zeros()));
        let html = exporter().render(&scene).expect("render");

        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains("<\\/script><b>"));
    }

    #[test]
    fn test_placeholder_names_in_user_text_survive() {
        let mut config = ApplicationConfig::default();
        config.viewport.title = "__OBJECTS__ viewer".to_string();
        let scene = Scene::new("__SETTINGS__", crate::scene::Camera::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0)));
        let html = HtmlExporter::new(&config).render(&scene).expect("render");

        assert!(html.contains("<title>🌍 __OBJECTS__ viewer 🌍</title>"));
        assert!(html.contains("SCENE: __SETTINGS__"));
        assert_eq!(html.matches("\"wovenCounter\"").count(), 1);
    }

    #[test]
    fn test_fill_template_single_pass() {
        let placeholders = [("__A__", "__B__".to_string()), ("__B__", "b".to_string())];
        assert_eq!(fill_template("x___A__ __B__ __C__", &placeholders), "x___B__ b __C__");
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(DEFAULT_HTML_FILE);
        let written = exporter().write_to(&Scene::default(), &path).expect("write");

        assert_eq!(written, path);
        let contents = std::fs::read_to_string(&path).expect("read back");
        assert!(contents.contains("class ElriaView"));
    }
}
