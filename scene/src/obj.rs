use std::path::Path;

use crate::{
    Error, ImportOptions, Instance, Material, MaterialTexture, Mesh, Result, Scene, TextureKind,
    Vertex, io::FileLoader, process, registry::TextureRegistry,
};

pub struct Obj;

impl FileLoader for Obj {
    const SUPPORTED_EXTENSIONS: &'static [&'static str] = &["obj"];

    fn load(filename: impl AsRef<Path>, options: &ImportOptions) -> Result<Scene> {
        firestorm::profile_method!(load);

        let filename = filename.as_ref();
        let filedir = filename.parent().unwrap_or_else(|| Path::new("./"));

        let load_options = tobj::LoadOptions {
            single_index: true,
            triangulate: options.triangulate,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        let (models, materials) = tobj::load_obj(filename, &load_options)?;
        let materials = materials.unwrap_or_else(|err| {
            log::warn!("Ignoring materials of {}: {err}", filename.display());
            Vec::new()
        });

        let mut registry = TextureRegistry::default();
        let mut scene = Scene {
            directory: filedir.to_owned(),
            ..Default::default()
        };
        scene.materials = materials
            .iter()
            .map(|material| convert_material(material, filedir, &mut registry))
            .collect();

        // a material switch before any face leaves an empty model behind
        for model in models.into_iter().filter(|model| !model.mesh.indices.is_empty()) {
            let mut mesh = convert_mesh(model, options)?;
            mesh.material = mesh.material.filter(|&m| m < scene.materials.len());
            scene.instances.push(Instance {
                mesh: scene.meshes.len(),
                transform: glam::Mat4::IDENTITY,
            });
            scene.meshes.push(mesh);
        }

        scene.textures = registry.into_textures();
        scene.update_bounding_box();
        scene.validate()?;

        log::info!(
            "Loaded {}: {} meshes, {} materials, {} textures",
            filename.display(),
            scene.meshes.len(),
            scene.materials.len(),
            scene.textures.len(),
        );
        Ok(scene)
    }
}

fn convert_mesh(model: tobj::Model, options: &ImportOptions) -> Result<Mesh> {
    let tobj::Model { mesh, name, .. } = model;

    // without triangulation tobj keeps polygon arities; anything but triangles is unusable
    if mesh.face_arities.iter().any(|&arity| arity != 3) {
        return Err(Error::InvalidPrimitive {
            mesh: name,
            primitive: 0,
            reason: String::from("non-triangular faces; enable triangulation"),
        });
    }

    let vertex_count = mesh.positions.len() / 3;
    let vertices = (0..vertex_count)
        .map(|i| {
            let attribute = |data: &[f32], width: usize| {
                data.get(i * width..(i + 1) * width)
                    .map_or_else(|| vec![0.; width], <[f32]>::to_vec)
            };
            Vertex::new(
                &attribute(&mesh.positions, 3),
                &attribute(&mesh.normals, 3),
                &attribute(&mesh.texcoords, 2),
            )
        })
        .collect();

    let mut loaded = Mesh::new(name, vertices, mesh.indices);
    loaded.material = mesh.material_id;
    process::apply(&mut loaded, options, true);

    log::debug!(
        "Mesh {}: {} vertices, {} triangles",
        loaded.name,
        loaded.vertices.len(),
        loaded.triangle_count()
    );
    Ok(loaded)
}

fn convert_material(
    material: &tobj::Material,
    directory: &Path,
    registry: &mut TextureRegistry,
) -> Material {
    let defaults = Material::default();

    let textures = [
        (TextureKind::Diffuse, &material.diffuse_texture),
        (TextureKind::Specular, &material.specular_texture),
        (TextureKind::Normal, &material.normal_texture),
        (TextureKind::Height, &material.ambient_texture),
    ]
    .into_iter()
    .filter_map(|(kind, path)| {
        path.as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| MaterialTexture {
                kind,
                texture: registry.resolve(directory, path),
            })
    })
    .collect();

    Material {
        name: material.name.clone(),
        textures,
        diffuse_color: material
            .diffuse
            .map_or(defaults.diffuse_color, glam::Vec3::from),
        specular_color: material
            .specular
            .map_or(defaults.specular_color, glam::Vec3::from),
        shininess: material
            .shininess
            .filter(|&shininess| shininess > 0.)
            .unwrap_or(defaults.shininess),
    }
}
