use std::io::{ BufRead, BufReader };
use std::path::{ Path, PathBuf };
use std::fs::File;

use crate::error::SceneError;
use crate::tuple::Tuple3D;
use crate::shape::TriangleInfo;

/// One corner of a face: a vertex index and an optional normal index, both
/// zero-based.
type ObjCorner = (usize, Option<usize>);

/// A parser for the subset of Wavefront OBJ used for triangle meshes.
///
/// Only `v`, `vn` and `f` statements are understood. Everything else
/// (texture coordinates, groups, materials, comments) is counted in
/// `ignored_lines` and skipped.
#[derive(Clone, Debug, Default)]
pub struct ObjParser {
    pub path: PathBuf,
    pub ignored_lines: usize,

    pub vertices: Vec<Tuple3D>,
    pub normals: Vec<Tuple3D>,
    pub triangles: Vec<TriangleInfo>,

    line: usize,
}

impl ObjParser {
    /// Creates a parser. `path` is only used to label errors.
    pub fn new<P: Into<PathBuf>>(path: P) -> ObjParser {
        ObjParser { path: path.into(), ..Default::default() }
    }

    /// Reads and parses the OBJ file at `path`.
    pub fn load(path: &Path) -> Result<ObjParser, SceneError> {
        let file = File::open(path).map_err(|source| SceneError::Io {
            path: path.into(),
            source,
        })?;

        let mut parser = ObjParser::new(path);
        parser.parse(BufReader::new(file))?;
        Ok(parser)
    }

    /// Parses OBJ statements from a reader.
    ///
    /// Can be called more than once; indices in later input may refer to
    /// vertices read earlier.
    pub fn parse<R: BufRead>(&mut self, reader: R) -> Result<(), SceneError> {
        for line in reader.lines() {
            self.line += 1;
            let line = line.map_err(|source| SceneError::Io {
                path: self.path.clone(),
                source,
            })?;

            self.handle_command(&line)?;
        }

        log::debug!(
            "{:?}: {} vertices, {} normals, {} triangles, {} ignored lines",
            self.path, self.vertices.len(), self.normals.len(),
            self.triangles.len(), self.ignored_lines
        );

        Ok(())
    }

    pub fn parse_str(&mut self, source: &str) -> Result<(), SceneError> {
        self.parse(source.as_bytes())
    }

    fn error(&self, message: String) -> SceneError {
        SceneError::Mesh {
            path: self.path.clone(),
            line: self.line,
            message,
        }
    }

    /// Parses one line of an OBJ file.
    ///
    /// ```obj
    /// v -1 1 0
    /// v -1 0 0
    /// v 1 0 0
    /// vn 0 0 1
    /// f 1//1 2//1 3//1
    /// ```
    ///
    /// `v` adds a vertex and `vn` a normal. `f` lists the corners of a
    /// polygon as `v`, `v/vt`, `v//vn` or `v/vt/vn`, where indices start at
    /// one and negative indices count back from the latest entry.
    fn handle_command(&mut self, line: &str) -> Result<(), SceneError> {
        let line = match line.find('#') {
            Some(i) => &line[..i],
            None => line,
        };

        let mut params = line.split_whitespace();
        match params.next() {
            None => Ok(()),
            Some("v") => {
                let v = self.parse_triple(params)?;
                self.vertices.push(v);
                Ok(())
            },
            Some("vn") => {
                let n = self.parse_triple(params)?;
                self.normals.push(n.try_normalize().unwrap_or_default());
                Ok(())
            },
            Some("f") => {
                let face = params
                    .map(|corner| self.parse_corner(corner))
                    .collect::<Result<Vec<_>, _>>()?;

                if face.len() < 3 {
                    return Err(self.error(
                        format!("face needs at least 3 corners, got {}", face.len())
                    ));
                }

                let triangles = self.fan_triangulation(&face);
                self.triangles.extend(triangles);
                Ok(())
            },
            Some(other) => {
                log::debug!("{:?}, line {}: ignoring '{}'", self.path, self.line, other);
                self.ignored_lines += 1;
                Ok(())
            },
        }
    }

    fn parse_triple<'a, I>(&self, params: I) -> Result<Tuple3D, SceneError>
        where I: Iterator<Item = &'a str> {
        let values = params
            .take(3)
            .map(|p| p.parse::<f64>()
                .map_err(|e| self.error(format!("bad number '{}': {}", p, e))))
            .collect::<Result<Vec<f64>, _>>()?;

        if values.len() < 3 {
            return Err(self.error("expected three coordinates".into()));
        }

        Ok(Tuple3D::new(values[0], values[1], values[2]))
    }

    /// Turns a one-based (or negative, relative) index into a zero-based one.
    fn resolve_index(&self, raw: &str, count: usize, what: &str)
        -> Result<usize, SceneError> {
        let index: i64 = raw.parse()
            .map_err(|_| self.error(format!("bad {} index '{}'", what, raw)))?;

        let resolved = if index > 0 {
            index - 1
        } else {
            count as i64 + index
        };

        if index == 0 || resolved < 0 || resolved >= count as i64 {
            return Err(self.error(
                format!("{} index {} out of range (have {})", what, index, count)
            ));
        }

        Ok(resolved as usize)
    }

    fn parse_corner(&self, corner: &str) -> Result<ObjCorner, SceneError> {
        let mut attributes = corner.split('/');

        let vertex = match attributes.next() {
            Some(v) => self.resolve_index(v, self.vertices.len(), "vertex")?,
            None => return Err(self.error("empty face corner".into())),
        };

        // Texture coordinates are skipped.
        let _texture = attributes.next();

        let normal = match attributes.next() {
            Some(n) if !n.is_empty() =>
                Some(self.resolve_index(n, self.normals.len(), "normal")?),
            _ => None,
        };

        if attributes.next().is_some() {
            return Err(self.error(format!("too many attributes in '{}'", corner)));
        }

        Ok((vertex, normal))
    }

    /// Partitions a polygon into triangles.
    ///
    /// ```text
    ///         B *
    ///          / \
    ///         /   \
    ///     A *       * C
    ///       |       |
    ///     E * ----- * D
    /// ```
    ///
    /// Every triangle shares the first corner: `A-B-C`, `A-C-D`, `A-D-E`.
    /// A triangle gets the listed normals only when all three of its corners
    /// have one; otherwise it uses its face normal.
    fn fan_triangulation(&self, face: &[ObjCorner]) -> Vec<TriangleInfo> {
        let mut triangles = Vec::new();

        for i in 1..(face.len() - 1) {
            let corners = [face[0], face[i], face[i + 1]];
            let vertices = [
                self.vertices[corners[0].0],
                self.vertices[corners[1].0],
                self.vertices[corners[2].0],
            ];

            let triangle = match (corners[0].1, corners[1].1, corners[2].1) {
                (Some(n1), Some(n2), Some(n3)) => TriangleInfo::with_normals(
                    vertices,
                    [self.normals[n1], self.normals[n2], self.normals[n3]],
                ),
                _ => TriangleInfo::new(vertices[0], vertices[1], vertices[2]),
            };

            triangles.push(triangle);
        }

        triangles
    }
}

#[cfg(test)]
fn parse(source: &str) -> Result<ObjParser, SceneError> {
    let mut parser = ObjParser::new("test.obj");
    parser.parse_str(source)?;
    Ok(parser)
}

#[test]
fn ignoring_unrecognized_lines() {
    let parser = parse("There was a young lady named Bright\n\
        who traveled much faster than light.\n\
        \n\
        # just a comment\n\
        g SomeGroup\n").unwrap();

    assert_eq!(parser.ignored_lines, 3);
    assert!(parser.triangles.is_empty());
}

#[test]
fn vertex_records() {
    let parser = parse("v -1 1 0\nv -1.0000 0.5000 0.0000\nv 1 0 0\nv 1 1 0\n").unwrap();

    assert_eq!(parser.vertices, vec![
        Tuple3D::new(-1.0, 1.0, 0.0),
        Tuple3D::new(-1.0, 0.5, 0.0),
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(1.0, 1.0, 0.0),
    ]);
}

#[test]
fn parsing_triangle_faces() {
    let parser = parse("v -1 1 0\nv -1 0 0\nv 1 0 0\nv 1 1 0\n\nf 1 2 3\nf 1 3 4\n").unwrap();

    assert_eq!(parser.triangles.len(), 2);
    assert_eq!(parser.triangles[0].vertices, [
        parser.vertices[0], parser.vertices[1], parser.vertices[2]
    ]);
    assert_eq!(parser.triangles[1].vertices, [
        parser.vertices[0], parser.vertices[2], parser.vertices[3]
    ]);
}

#[test]
fn triangulating_polygons() {
    let parser = parse("v -1 1 0\nv -1 0 0\nv 1 0 0\nv 1 1 0\nv 0 2 0\n\nf 1 2 3 4 5\n").unwrap();

    assert_eq!(parser.triangles.len(), 3);
    assert_eq!(parser.triangles[2].vertices, [
        parser.vertices[0], parser.vertices[3], parser.vertices[4]
    ]);
}

#[test]
fn faces_with_normals() {
    let parser = parse("v 0 1 0\nv -1 0 0\nv 1 0 0\n\
        vn -1 0 0\nvn 1 0 0\nvn 0 1 0\n\
        f 1//3 2//1 3//2\nf 1/0/3 2/102/1 3/14/2\n").unwrap();

    assert_eq!(parser.normals.len(), 3);
    assert_eq!(parser.triangles.len(), 2);
    assert_eq!(parser.triangles[0], parser.triangles[1]);
    assert_eq!(parser.triangles[0].normals, [
        Tuple3D::new(0.0, 1.0, 0.0),
        Tuple3D::new(-1.0, 0.0, 0.0),
        Tuple3D::new(1.0, 0.0, 0.0),
    ]);
}

#[test]
fn negative_indices_are_relative() {
    let parser = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
    assert_eq!(parser.triangles[0].vertices[0], Tuple3D::zero());
    assert_eq!(parser.triangles[0].vertices[2], Tuple3D::new(0.0, 1.0, 0.0));
}

#[test]
fn out_of_range_index_is_an_error() {
    match parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n") {
        Err(SceneError::Mesh { line, .. }) => assert_eq!(line, 4),
        other => panic!("expected a mesh error, got {:?}", other),
    }

    assert!(parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").is_err());
}

#[test]
fn malformed_numbers_are_errors() {
    match parse("v 0 0 0\nv 1 zero 0\n") {
        Err(SceneError::Mesh { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected a mesh error, got {:?}", other),
    }

    assert!(parse("v 0 0\n").is_err());
    assert!(parse("v 0 0 0\nv 1 0 0\nf 1 2\n").is_err());
}

#[test]
fn normal_records_are_unit_length() {
    let parser = parse("vn 0 3 4\nvn 0 0 0\n").unwrap();

    assert_eq!(parser.normals, vec![
        Tuple3D::new(0.0, 0.6, 0.8),
        Tuple3D::zero(),
    ]);
}
