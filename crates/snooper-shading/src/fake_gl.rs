//! Recording stand-in for a GL context.
//!
//! Compiling checks brace/parenthesis balance and that exactly one `#version`
//! leads the source. Linking requires every fragment `in` to match a vertex
//! `out` of the same type, then hands out uniform locations for every
//! `uniform` line in both stages. Object names are never reused, so handle
//! collisions show up as faults instead of silently aliasing.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use gl::types::{GLenum, GLint, GLuint};
use snooper_gl::GlContext;

use crate::probe::MAX_TEXTURE_COORDS;

#[derive(Debug, Clone, PartialEq)]
pub enum Uploaded {
    Int(i32),
    Uint(u32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub program: GLuint,
    pub location: GLint,
    pub value: Uploaded,
}

#[derive(Debug)]
struct FakeShader {
    kind: GLenum,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct FakeProgram {
    attached: Vec<GLuint>,
    linked: bool,
    log: String,
    locations: HashMap<String, GLint>,
    declared: Vec<(String, String)>,
}

#[derive(Debug)]
struct State {
    next_id: GLuint,
    shaders: HashMap<GLuint, FakeShader>,
    programs: HashMap<GLuint, FakeProgram>,
    current: GLuint,
    max_texture_coords: GLint,
    compile_warning: Option<String>,
    silent_compile_failure: bool,
    errors: VecDeque<GLenum>,
    location_queries: usize,
    uploads: Vec<Upload>,
    compiled_sources: Vec<(GLenum, String)>,
    faults: Vec<String>,
}

#[derive(Debug)]
pub struct FakeGl {
    state: RefCell<State>,
}

impl Default for FakeGl {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGl {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                next_id: 1,
                shaders: HashMap::new(),
                programs: HashMap::new(),
                current: 0,
                max_texture_coords: 8,
                compile_warning: None,
                silent_compile_failure: false,
                errors: VecDeque::new(),
                location_queries: 0,
                uploads: Vec::new(),
                compiled_sources: Vec::new(),
                faults: Vec::new(),
            }),
        }
    }

    /// Emulate a context that answers `GL_MAX_TEXTURE_COORDS` with `value`.
    /// `0` behaves like a core profile: the query also raises
    /// `GL_INVALID_ENUM`.
    pub fn with_max_texture_coords(self, value: GLint) -> Self {
        self.state.borrow_mut().max_texture_coords = value;
        self
    }

    /// Emit `log` from every successful compile, like drivers that report
    /// informational messages.
    pub fn with_compile_warning(self, log: &str) -> Self {
        self.state.borrow_mut().compile_warning = Some(log.to_owned());
        self
    }

    /// Report every compile as failed with an empty info log, like drivers
    /// that drop the diagnostic.
    pub fn with_silent_compile_failure(self) -> Self {
        self.state.borrow_mut().silent_compile_failure = true;
        self
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn location_queries(&self) -> usize {
        self.state.borrow().location_queries
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.borrow().uploads.clone()
    }

    pub fn current_program(&self) -> GLuint {
        self.state.borrow().current
    }

    pub fn pending_errors(&self) -> usize {
        self.state.borrow().errors.len()
    }

    /// Misuse observed so far (double deletes, uploads with nothing bound).
    pub fn faults(&self) -> Vec<String> {
        self.state.borrow().faults.clone()
    }

    /// Text of the most recent compile of a `kind` stage.
    pub fn last_source(&self, kind: GLenum) -> Option<String> {
        self.state
            .borrow()
            .compiled_sources
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, source)| source.clone())
    }

    /// `(type, name)` of every uniform declared in a linked program.
    pub fn declared_uniforms(&self, program: GLuint) -> Vec<(String, String)> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.declared.clone())
            .unwrap_or_default()
    }

    fn record_upload(&self, location: GLint, value: Uploaded) {
        let mut state = self.state.borrow_mut();
        if state.current == 0 {
            state
                .faults
                .push(format!("uniform upload to {location} with no program bound"));
        }
        let program = state.current;
        state.uploads.push(Upload {
            program,
            location,
            value,
        });
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(at) => &line[..at],
        None => line,
    }
}

fn check_syntax(source: &str) -> Result<(), String> {
    let mut versions = 0;
    let mut first_directive_ok = false;
    let mut seen_code = false;
    let mut braces = 0i32;
    let mut parens = 0i32;

    for (number, raw) in source.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("#version") {
            versions += 1;
            if !seen_code {
                first_directive_ok = true;
            }
        }
        seen_code = true;

        for c in line.chars() {
            match c {
                '{' => braces += 1,
                '}' => braces -= 1,
                '(' => parens += 1,
                ')' => parens -= 1,
                _ => {}
            }
            if braces < 0 || parens < 0 {
                return Err(format!("0({}) : error C0000: syntax error, unexpected '{c}'", number + 1));
            }
        }
    }

    if versions != 1 || !first_directive_ok {
        return Err(format!(
            "0(1) : error C0204: version directive must be first statement and may not be repeated ({versions} found)"
        ));
    }
    if braces != 0 || parens != 0 {
        return Err("0(0) : error C0000: syntax error, unexpected end of file".to_owned());
    }
    Ok(())
}

fn defines(source: &str) -> HashMap<String, String> {
    source
        .lines()
        .filter_map(|line| {
            let mut tokens = strip_comment(line).split_whitespace();
            (tokens.next()? == "#define").then_some(())?;
            Some((tokens.next()?.to_owned(), tokens.next()?.to_owned()))
        })
        .collect()
}

/// `(type, name, array length)` of every `storage` declaration.
fn declarations(source: &str, storage: &str) -> Vec<(String, String, Option<usize>)> {
    const QUALIFIERS: &[&str] = &["flat", "smooth", "noperspective", "centroid", "highp", "mediump", "lowp"];

    let defines = defines(source);
    let mut found = Vec::new();

    for raw in source.lines() {
        let mut line = strip_comment(raw).trim();
        if !line.ends_with(';') {
            continue;
        }
        if line.starts_with("layout") {
            match line.find(')') {
                Some(at) => line = line[at + 1..].trim(),
                None => continue,
            }
        }

        let tokens: Vec<&str> = line
            .trim_end_matches(';')
            .split_whitespace()
            .filter(|t| !QUALIFIERS.contains(t))
            .collect();
        if tokens.len() != 3 || tokens[0] != storage {
            continue;
        }

        let (name, len) = match tokens[2].split_once('[') {
            Some((name, rest)) => {
                let expr = rest.trim_end_matches(']');
                let expr = defines.get(expr).map(String::as_str).unwrap_or(expr);
                (name, expr.parse().ok())
            }
            None => (tokens[2], None),
        };
        found.push((tokens[1].to_owned(), name.to_owned(), len));
    }

    found
}

impl GlContext for FakeGl {
    fn create_shader(&self, kind: GLenum) -> GLuint {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.shaders.insert(
            id,
            FakeShader {
                kind,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        id
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_owned();
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let warning = state.compile_warning.clone();
        let silent = state.silent_compile_failure;
        let Some(s) = state.shaders.get_mut(&shader) else {
            state.errors.push_back(gl::INVALID_VALUE);
            return;
        };
        match check_syntax(&s.source) {
            Ok(()) if silent => {
                s.compiled = false;
                s.log.clear();
            }
            Ok(()) => {
                s.compiled = true;
                s.log = warning.unwrap_or_default();
            }
            Err(log) => {
                s.compiled = false;
                s.log = log;
            }
        }
        let entry = (s.kind, s.source.clone());
        state.compiled_sources.push(entry);
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        if state.shaders.remove(&shader).is_none() {
            state.faults.push(format!("delete of unknown shader {shader}"));
        }
    }

    fn create_program(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.programs.insert(id, FakeProgram::default());
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        if !state.shaders.contains_key(&shader) {
            state.faults.push(format!("attach of unknown shader {shader}"));
            return;
        }
        match state.programs.get_mut(&program) {
            Some(p) => p.attached.push(shader),
            None => state.faults.push(format!("attach to unknown program {program}")),
        }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        let detached = state.programs.get_mut(&program).is_some_and(|p| {
            let before = p.attached.len();
            p.attached.retain(|&s| s != shader);
            p.attached.len() != before
        });
        if !detached {
            state
                .faults
                .push(format!("detach of shader {shader} not attached to {program}"));
        }
    }

    fn link_program(&self, program: GLuint) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let Some(attached) = state.programs.get(&program).map(|p| p.attached.clone()) else {
            state.errors.push_back(gl::INVALID_VALUE);
            return;
        };

        let stage = |kind: GLenum| {
            let mut matching = attached
                .iter()
                .filter_map(|id| state.shaders.get(id))
                .filter(|s| s.kind == kind);
            match (matching.next(), matching.next()) {
                (Some(s), None) if s.compiled => Ok(s.source.clone()),
                (Some(_), None) => Err("error: attached shader is not compiled".to_owned()),
                _ => Err(format!("error: expected exactly one shader of type {kind:#x}")),
            }
        };

        let linked = stage(gl::VERTEX_SHADER).and_then(|vertex| {
            let fragment = stage(gl::FRAGMENT_SHADER)?;
            let outputs = declarations(&vertex, "out");
            for (ty, name, _) in declarations(&fragment, "in") {
                if !outputs.iter().any(|(t, n, _)| *t == ty && *n == name) {
                    return Err(format!(
                        "error: fragment input `{name}` ({ty}) has no matching vertex output"
                    ));
                }
            }
            Ok((vertex, fragment))
        });

        let Some(p) = state.programs.get_mut(&program) else {
            return;
        };
        match linked {
            Ok((vertex, fragment)) => {
                let mut next_location = 0;
                p.locations.clear();
                p.declared.clear();
                for (ty, name, len) in declarations(&vertex, "uniform")
                    .into_iter()
                    .chain(declarations(&fragment, "uniform"))
                {
                    if p.locations.contains_key(&name) {
                        continue;
                    }
                    p.locations.insert(name.clone(), next_location);
                    if let Some(len) = len {
                        for i in 0..len {
                            p.locations.insert(format!("{name}[{i}]"), next_location + i as GLint);
                        }
                        next_location += len.max(1) as GLint;
                    } else {
                        next_location += 1;
                    }
                    p.declared.push((ty, name));
                }
                p.linked = true;
                p.log.clear();
            }
            Err(log) => {
                p.linked = false;
                p.log = log;
            }
        }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        if state.programs.remove(&program).is_none() {
            state.faults.push(format!("delete of unknown program {program}"));
        }
        if state.current == program {
            state.current = 0;
        }
    }

    fn use_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        let usable = program == 0 || state.programs.get(&program).is_some_and(|p| p.linked);
        if usable {
            state.current = program;
        } else {
            state.errors.push_back(gl::INVALID_OPERATION);
        }
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        let mut state = self.state.borrow_mut();
        state.location_queries += 1;
        state
            .programs
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.locations.get(name).copied())
            .unwrap_or(-1)
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        self.record_upload(location, Uploaded::Int(value));
    }

    fn uniform_1ui(&self, location: GLint, value: u32) {
        self.record_upload(location, Uploaded::Uint(value));
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        self.record_upload(location, Uploaded::Float(value));
    }

    fn uniform_2f(&self, location: GLint, x: f32, y: f32) {
        self.record_upload(location, Uploaded::Vec2([x, y]));
    }

    fn uniform_3f(&self, location: GLint, x: f32, y: f32, z: f32) {
        self.record_upload(location, Uploaded::Vec3([x, y, z]));
    }

    fn uniform_4f(&self, location: GLint, x: f32, y: f32, z: f32, w: f32) {
        self.record_upload(location, Uploaded::Vec4([x, y, z, w]));
    }

    fn uniform_matrix_4f(&self, location: GLint, _transpose: bool, value: &[f32; 16]) {
        self.record_upload(location, Uploaded::Mat4(*value));
    }

    fn get_integer(&self, pname: GLenum) -> GLint {
        let mut state = self.state.borrow_mut();
        let value = if pname == MAX_TEXTURE_COORDS {
            state.max_texture_coords
        } else {
            0
        };
        if value == 0 {
            state.errors.push_back(gl::INVALID_ENUM);
        }
        value
    }

    fn get_string(&self, name: GLenum) -> Option<String> {
        let text = match name {
            gl::VENDOR => "Snooper",
            gl::RENDERER => "recording fake",
            gl::VERSION => "4.6.0 fake",
            gl::SHADING_LANGUAGE_VERSION => "4.60 fake",
            _ => return None,
        };
        Some(text.to_owned())
    }

    fn get_error(&self) -> GLenum {
        self.state
            .borrow_mut()
            .errors
            .pop_front()
            .unwrap_or(gl::NO_ERROR)
    }
}
