//! raybox CLI — BVH construction and ray queries over triangle meshes.
//!
//! Loads a mesh from an OBJ file, builds the hierarchy, and answers
//! queries: tree statistics, a leaf-box geometry dump, or a single ray
//! cast.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use raybox_bvh::{Bvh, DEFAULT_MAX_DEPTH};
use raybox_math::{Point3, Ray, Vec3};

mod obj;

#[derive(Parser)]
#[command(name = "raybox")]
#[command(about = "SAH BVH construction and ray queries over triangle meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the BVH and print tree statistics
    Info {
        /// Input OBJ mesh
        mesh: PathBuf,
        /// Build depth limit
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        depth: usize,
    },
    /// Build the BVH and write every leaf AABB as boxes in an OBJ file
    DumpLeaves {
        /// Input OBJ mesh
        mesh: PathBuf,
        /// Output OBJ file
        output: PathBuf,
        /// Build depth limit
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        depth: usize,
    },
    /// Build the BVH and cast a single ray at it
    Cast {
        /// Input OBJ mesh
        mesh: PathBuf,
        /// Ray origin as `x,y,z`
        #[arg(long, value_parser = parse_point)]
        origin: Point3,
        /// Ray direction as `x,y,z`
        #[arg(long, value_parser = parse_vec)]
        direction: Vec3,
        /// Build depth limit
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        depth: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { mesh, depth } => info(&mesh, depth),
        Commands::DumpLeaves {
            mesh,
            output,
            depth,
        } => dump_leaves(&mesh, &output, depth),
        Commands::Cast {
            mesh,
            origin,
            direction,
            depth,
        } => cast(&mesh, &origin, &direction, depth),
    }
}

fn build_from_obj(path: &Path, depth: usize) -> Result<Bvh> {
    let mesh = obj::load_obj(path).with_context(|| format!("loading {}", path.display()))?;
    let mut bvh = Bvh::new(mesh);
    bvh.build(depth);
    Ok(bvh)
}

fn info(path: &Path, depth: usize) -> Result<()> {
    let bvh = build_from_obj(path, depth)?;
    println!("vertices: {}", bvh.mesh().vertices.len());
    println!("faces:    {}", bvh.mesh().faces.len());
    println!("nodes:    {}", bvh.n_nodes());
    println!("leaves:   {}", bvh.n_leaves());
    println!("depth:    {}", bvh.depth());
    let root = bvh.bbox(Bvh::ROOT);
    if !root.is_empty() {
        println!(
            "bounds:   ({}, {}, {}) .. ({}, {}, {})",
            root.min.x, root.min.y, root.min.z, root.max.x, root.max.y, root.max.z
        );
    }
    Ok(())
}

fn dump_leaves(path: &Path, output: &Path, depth: usize) -> Result<()> {
    let bvh = build_from_obj(path, depth)?;
    bvh.save_leaves_obj(output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("wrote {} leaf boxes to {}", bvh.n_leaves(), output.display());
    Ok(())
}

fn cast(path: &Path, origin: &Point3, direction: &Vec3, depth: usize) -> Result<()> {
    let bvh = build_from_obj(path, depth)?;

    let mut stack = vec![0u32; bvh.max_depth()];
    stack[0] = Bvh::ROOT;
    let mut stack_len = 1;

    match bvh.intersect_leaves(origin, direction, &mut stack_len, &mut stack) {
        Some(hit) => {
            let entry = Ray::new(*origin, *direction).at(hit.t_enter);
            println!("leaf:    {}", hit.leaf);
            println!("t_enter: {}", hit.t_enter);
            println!("t_exit:  {}", hit.t_exit);
            println!("entry:   ({}, {}, {})", entry.x, entry.y, entry.z);
        }
        None => println!("no hit"),
    }
    Ok(())
}

fn parse_components(s: &str) -> Result<[f32; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected `x,y,z`, got `{s}`"));
    }
    let mut out = [0.0f32; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("bad component `{part}`: {e}"))?;
    }
    Ok(out)
}

fn parse_point(s: &str) -> Result<Point3, String> {
    parse_components(s).map(|[x, y, z]| Point3::new(x, y, z))
}

fn parse_vec(s: &str) -> Result<Vec3, String> {
    parse_components(s).map(|[x, y, z]| Vec3::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_components() {
        assert_eq!(parse_components("1,2,3").unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(
            parse_components("-1.5, 0, 2.25").unwrap(),
            [-1.5, 0.0, 2.25]
        );
        assert!(parse_components("1,2").is_err());
        assert!(parse_components("1,2,x").is_err());
    }
}
