//! The model graph: bases, points, frames, solids and wrenches, and the symbols they are
//! described with.
//!
//! A [`Model`] owns every node in typed arenas and hands out [`Copy`] handles ([`BaseId`],
//! [`PointId`], ...). Nodes refer to their previous node by handle, so removing a node can never
//! leave a dangling reference behind: removal is refused while another node still uses it, and a
//! handle to a removed node is reported as [`StaleHandle`](crate::error::model::StaleHandle).
//!
//! Every model starts with the absolute base `xyz`, the origin point `O` and the absolute frame
//! `abs` made of the two. Further roots can be created with [`Model::new_root_base`] and
//! [`Model::new_root_point`]; nodes of different trees cannot be related to each other.

pub(crate) mod arena;
pub mod id;
mod node;
pub(crate) mod tree;
mod vector;

pub use id::{BaseId, FrameId, PointId, SolidId, WrenchId};
pub use node::{Base, Frame, Point, Solid};
pub use vector::{Tensor3D, Vector3D};

use crate::{
    error::{
        composition::NonUnitAxis,
        model::{DisjointTrees, InUse, RootRemoval},
        Error,
    },
    settings::Settings,
    symbols::{Coordinate, SymbolRegistry},
    wrench::Wrench,
};
use arena::Arena;
use id::Handle;
use mech_algebra::{simplify, Expr, Matrix};
use tree::{common_ancestor, tree_path, Step};

/// A multibody model.
#[derive(Debug, Clone)]
pub struct Model {
    settings: Settings,
    symbols: SymbolRegistry,
    gravity: Expr,
    pub(crate) bases: Arena<Base>,
    pub(crate) points: Arena<Point>,
    pub(crate) frames: Arena<Frame>,
    pub(crate) solids: Arena<Solid>,
    pub(crate) wrenches: Arena<Wrench>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates a model with the default [`Settings`].
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Creates a model containing the roots `xyz`, `O` and `abs`, the time symbol `t` and the
    /// gravity parameter `g`.
    pub fn with_settings(settings: Settings) -> Self {
        let (symbols, gravity) = SymbolRegistry::with_gravity("t", "g");

        let mut bases = Arena::default();
        let mut points = Arena::default();
        let mut frames = Arena::default();
        let xyz = bases.push(Base::root("xyz"));
        let origin = points.push(Point {
            name: "O".to_string(),
            previous: None,
            position: Vector3D::zero(xyz),
        });
        frames.push(Frame { name: "abs".to_string(), point: origin, base: xyz });

        Self {
            settings,
            symbols,
            gravity,
            bases,
            points,
            frames,
            solids: Arena::default(),
            wrenches: Arena::default(),
        }
    }

    /// The settings the model was created with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The registered symbols.
    pub fn symbols(&self) -> &SymbolRegistry {
        &self.symbols
    }

    /// The time symbol, `t`.
    pub fn time(&self) -> Expr {
        self.symbols.time()
    }

    /// The gravity parameter, `g`.
    pub fn gravity(&self) -> &Expr {
        &self.gravity
    }

    /// See [`SymbolRegistry::new_coordinate`].
    pub fn new_coordinate(&mut self, name: &str) -> Result<Coordinate, Error> {
        self.symbols.new_coordinate(name)
    }

    /// See [`SymbolRegistry::new_coordinate_with`].
    pub fn new_coordinate_with(&mut self, q: &str, dq: &str, ddq: &str) -> Result<Coordinate, Error> {
        self.symbols.new_coordinate_with(q, dq, ddq)
    }

    /// See [`SymbolRegistry::new_aux_coordinate`].
    pub fn new_aux_coordinate(&mut self, name: &str) -> Result<Coordinate, Error> {
        self.symbols.new_aux_coordinate(name)
    }

    /// See [`SymbolRegistry::new_parameter`].
    pub fn new_parameter(&mut self, name: &str) -> Result<Expr, Error> {
        self.symbols.new_parameter(name)
    }

    /// See [`SymbolRegistry::new_input`].
    pub fn new_input(&mut self, name: &str) -> Result<Expr, Error> {
        self.symbols.new_input(name)
    }

    /// See [`SymbolRegistry::new_joint_unknown`].
    pub fn new_joint_unknown(&mut self, name: &str) -> Result<Expr, Error> {
        self.symbols.new_joint_unknown(name)
    }

    /// The absolute base, `xyz`.
    pub fn xyz(&self) -> BaseId {
        BaseId::from_index(0)
    }

    /// The origin, `O`.
    pub fn origin(&self) -> PointId {
        PointId::from_index(0)
    }

    /// The absolute frame, `abs`.
    pub fn abs(&self) -> FrameId {
        FrameId::from_index(0)
    }

    /// Creates a base with no previous base.
    pub fn new_root_base(&mut self, name: &str) -> Result<BaseId, Error> {
        self.bases.insert(Base::root(name))
    }

    /// Creates the base obtained by rotating `previous` by `angle` about `axis`. The axis
    /// components are given in `previous` and must form a unit vector.
    pub fn new_base(
        &mut self,
        name: &str,
        previous: BaseId,
        axis: [impl Into<Expr>; 3],
        angle: impl Into<Expr>,
    ) -> Result<BaseId, Error> {
        self.bases.get(previous)?;
        self.bases.check_name(name)?;

        let axis = Matrix::column(axis.map(Into::into));
        let norm = simplify(&axis.dot(&axis));
        if norm.is_number() && !norm.is_one() {
            return Err(NonUnitAxis { base: name.to_string(), norm: norm.to_string() }.into());
        }

        self.bases.insert(Base::rotated(name, previous, axis, angle.into()))
    }

    /// Creates a point with no previous point.
    pub fn new_root_point(&mut self, name: &str) -> Result<PointId, Error> {
        self.points.insert(Point {
            name: name.to_string(),
            previous: None,
            position: Vector3D::zero(self.xyz()),
        })
    }

    /// Creates the point at `position` from `previous`.
    pub fn new_point(&mut self, name: &str, previous: PointId, position: Vector3D) -> Result<PointId, Error> {
        self.points.get(previous)?;
        self.bases.get(position.base())?;
        self.points.insert(Point { name: name.to_string(), previous: Some(previous), position })
    }

    /// Creates a frame.
    pub fn new_frame(&mut self, name: &str, point: PointId, base: BaseId) -> Result<FrameId, Error> {
        self.points.get(point)?;
        self.bases.get(base)?;
        self.frames.insert(Frame { name: name.to_string(), point, base })
    }

    /// Creates a solid attached to `point` and `base`.
    ///
    /// This also registers the frame `name` made of `point` and `base`, and the centre of mass
    /// `<name>_G` at `center_of_mass` from `point`. The inertia tensor is about the centre of
    /// mass.
    pub fn new_solid(
        &mut self,
        name: &str,
        point: PointId,
        base: BaseId,
        mass: impl Into<Expr>,
        center_of_mass: Vector3D,
        inertia: Tensor3D,
    ) -> Result<SolidId, Error> {
        let cm_name = format!("{}_G", name);
        self.points.get(point)?;
        self.bases.get(base)?;
        self.bases.get(center_of_mass.base())?;
        self.bases.get(inertia.base())?;
        self.solids.check_name(name)?;
        self.frames.check_name(name)?;
        self.points.check_name(&cm_name)?;

        let frame = self.frames.insert(Frame { name: name.to_string(), point, base })?;
        let cm = self.points.insert(Point {
            name: cm_name,
            previous: Some(point),
            position: center_of_mass,
        })?;
        self.solids.insert(Solid {
            name: name.to_string(),
            frame,
            point,
            base,
            mass: mass.into(),
            center_of_mass: cm,
            inertia,
        })
    }

    /// Registers a wrench so that [`Model::generalized_forces`] takes it into account.
    pub fn new_wrench(&mut self, wrench: Wrench) -> Result<WrenchId, Error> {
        self.points.get(wrench.point())?;
        self.bases.get(wrench.force().base())?;
        self.bases.get(wrench.moment().base())?;
        for solid in wrench.solid().into_iter().chain(wrench.reaction()) {
            self.solids.get(solid)?;
        }
        self.wrenches.insert(wrench)
    }

    /// Finds a base by name.
    pub fn base(&self, name: &str) -> Result<BaseId, Error> {
        self.bases.lookup(name)
    }

    /// Finds a point by name.
    pub fn point(&self, name: &str) -> Result<PointId, Error> {
        self.points.lookup(name)
    }

    /// Finds a frame by name.
    pub fn frame(&self, name: &str) -> Result<FrameId, Error> {
        self.frames.lookup(name)
    }

    /// Finds a solid by name.
    pub fn solid(&self, name: &str) -> Result<SolidId, Error> {
        self.solids.lookup(name)
    }

    /// Finds a registered wrench by name.
    pub fn wrench(&self, name: &str) -> Result<WrenchId, Error> {
        self.wrenches.lookup(name)
    }

    /// Returns the base behind a handle.
    pub fn get_base(&self, id: BaseId) -> Result<&Base, Error> {
        self.bases.get(id)
    }

    /// Returns the point behind a handle.
    pub fn get_point(&self, id: PointId) -> Result<&Point, Error> {
        self.points.get(id)
    }

    /// Returns the frame behind a handle.
    pub fn get_frame(&self, id: FrameId) -> Result<&Frame, Error> {
        self.frames.get(id)
    }

    /// Returns the solid behind a handle.
    pub fn get_solid(&self, id: SolidId) -> Result<&Solid, Error> {
        self.solids.get(id)
    }

    /// Returns the registered wrench behind a handle.
    pub fn get_wrench(&self, id: WrenchId) -> Result<&Wrench, Error> {
        self.wrenches.get(id)
    }

    /// Iterates over the live bases in creation order.
    pub fn bases(&self) -> impl Iterator<Item = (BaseId, &Base)> + '_ {
        self.bases.iter()
    }

    /// Iterates over the live points in creation order.
    pub fn points(&self) -> impl Iterator<Item = (PointId, &Point)> + '_ {
        self.points.iter()
    }

    /// Iterates over the live frames in creation order.
    pub fn frames(&self) -> impl Iterator<Item = (FrameId, &Frame)> + '_ {
        self.frames.iter()
    }

    /// Iterates over the live solids in creation order.
    pub fn solids(&self) -> impl Iterator<Item = (SolidId, &Solid)> + '_ {
        self.solids.iter()
    }

    /// Iterates over the registered wrenches in creation order.
    pub fn wrenches(&self) -> impl Iterator<Item = (WrenchId, &Wrench)> + '_ {
        self.wrenches.iter()
    }

    /// The number of live nodes of each kind, as `(bases, points, frames, solids, wrenches)`.
    pub fn node_counts(&self) -> (usize, usize, usize, usize, usize) {
        (self.bases.len(), self.points.len(), self.frames.len(), self.solids.len(), self.wrenches.len())
    }

    /// Describes the first node that refers to the given base.
    fn base_user(&self, id: BaseId) -> Option<String> {
        if let Some((_, base)) = self.bases.iter().find(|(_, b)| b.previous == Some(id)) {
            return Some(format!("base `{}`", base.name));
        }
        if let Some((_, point)) = self.points.iter().find(|(_, p)| p.position.base() == id) {
            return Some(format!("point `{}`", point.name));
        }
        if let Some((_, solid)) = self.solids.iter().find(|(_, s)| s.base == id || s.inertia.base() == id) {
            return Some(format!("solid `{}`", solid.name));
        }
        if let Some((_, frame)) = self.frames.iter().find(|(_, f)| f.base == id) {
            return Some(format!("frame `{}`", frame.name));
        }
        self.wrenches.iter()
            .find(|(_, w)| w.force().base() == id || w.moment().base() == id)
            .map(|(_, wrench)| format!("wrench `{}`", wrench.name()))
    }

    /// Describes the first node other than `except` that refers to the given point.
    fn point_user(&self, id: PointId, except: Option<SolidId>) -> Option<String> {
        if let Some((_, point)) = self.points.iter().find(|(_, p)| p.previous == Some(id)) {
            return Some(format!("point `{}`", point.name));
        }
        if let Some((_, solid)) = self.solids.iter()
            .find(|(sid, s)| Some(*sid) != except && (s.point == id || s.center_of_mass == id))
        {
            return Some(format!("solid `{}`", solid.name));
        }
        let own_frame = except.and_then(|solid| self.solids.get(solid).ok()).map(|solid| solid.frame);
        if let Some((_, frame)) = self.frames.iter().find(|(fid, f)| Some(*fid) != own_frame && f.point == id) {
            return Some(format!("frame `{}`", frame.name));
        }
        self.wrenches.iter()
            .find(|(_, w)| w.point() == id)
            .map(|(_, wrench)| format!("wrench `{}`", wrench.name()))
    }

    /// Removes a base. Fails if any node refers to it.
    pub fn remove_base(&mut self, id: BaseId) -> Result<Base, Error> {
        let name = self.bases.get(id)?.name.clone();
        if id == self.xyz() {
            return Err(RootRemoval { kind: "base", name }.into());
        }
        if let Some(user) = self.base_user(id) {
            return Err(InUse { kind: "base", name, user }.into());
        }
        self.bases.remove(id)
    }

    /// Removes a point. Fails if any node refers to it.
    pub fn remove_point(&mut self, id: PointId) -> Result<Point, Error> {
        let name = self.points.get(id)?.name.clone();
        if id == self.origin() {
            return Err(RootRemoval { kind: "point", name }.into());
        }
        if let Some(user) = self.point_user(id, None) {
            return Err(InUse { kind: "point", name, user }.into());
        }
        self.points.remove(id)
    }

    /// Removes a frame. Fails if it is the frame of a solid.
    pub fn remove_frame(&mut self, id: FrameId) -> Result<Frame, Error> {
        let name = self.frames.get(id)?.name.clone();
        if id == self.abs() {
            return Err(RootRemoval { kind: "frame", name }.into());
        }
        if let Some((_, solid)) = self.solids.iter().find(|(_, s)| s.frame == id) {
            let user = format!("solid `{}`", solid.name);
            return Err(InUse { kind: "frame", name, user }.into());
        }
        self.frames.remove(id)
    }

    /// Removes a solid together with its frame and its centre of mass point. Fails if a wrench
    /// acts on the solid, or if another node refers to its centre of mass.
    pub fn remove_solid(&mut self, id: SolidId) -> Result<Solid, Error> {
        let solid = self.solids.get(id)?;
        let (name, frame, cm) = (solid.name.clone(), solid.frame, solid.center_of_mass);
        if let Some((_, wrench)) = self.wrenches.iter()
            .find(|(_, w)| w.solid() == Some(id) || w.reaction() == Some(id))
        {
            let user = format!("wrench `{}`", wrench.name());
            return Err(InUse { kind: "solid", name, user }.into());
        }
        if let Some(user) = self.point_user(cm, Some(id)) {
            let cm_name = self.points.get(cm)?.name.clone();
            return Err(InUse { kind: "point", name: cm_name, user }.into());
        }

        let solid = self.solids.remove(id)?;
        self.frames.remove(frame)?;
        self.points.remove(cm)?;
        Ok(solid)
    }

    /// Removes a registered wrench.
    pub fn remove_wrench(&mut self, id: WrenchId) -> Result<Wrench, Error> {
        self.wrenches.remove(id)
    }

    /// The path of base edges from `from` to `to`.
    pub(crate) fn base_path(&self, from: BaseId, to: BaseId) -> Result<Vec<Step<BaseId>>, Error> {
        tree_path(from, to, |id| Ok(self.bases.get(id)?.previous))?
            .ok_or_else(|| self.disjoint_bases(from, to))
    }

    /// The path of point edges from `from` to `to`.
    pub(crate) fn point_path(&self, from: PointId, to: PointId) -> Result<Vec<Step<PointId>>, Error> {
        tree_path(from, to, |id| Ok(self.points.get(id)?.previous))?
            .ok_or_else(|| self.disjoint_points(from, to))
    }

    pub(crate) fn disjoint_bases(&self, from: BaseId, to: BaseId) -> Error {
        let name = |id| self.bases.get(id).map(|b| b.name.clone()).unwrap_or_default();
        DisjointTrees { kind: "base", from: name(from), to: name(to) }.into()
    }

    fn disjoint_points(&self, from: PointId, to: PointId) -> Error {
        let name = |id| self.points.get(id).map(|p| p.name.clone()).unwrap_or_default();
        DisjointTrees { kind: "point", from: name(from), to: name(to) }.into()
    }

    /// The lowest common ancestor of two bases.
    pub fn reduced_base(&self, a: BaseId, b: BaseId) -> Result<BaseId, Error> {
        common_ancestor(a, b, |id| Ok(self.bases.get(id)?.previous))?
            .ok_or_else(|| self.disjoint_bases(a, b))
    }

    /// The lowest common ancestor of two points.
    pub fn reduced_point(&self, a: PointId, b: PointId) -> Result<PointId, Error> {
        common_ancestor(a, b, |id| Ok(self.points.get(id)?.previous))?
            .ok_or_else(|| self.disjoint_points(a, b))
    }
}
