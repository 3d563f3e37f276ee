//! The registry of symbols a model is described with.
//!
//! Every symbol that appears in kinematic data should be registered here, because the registry
//! is what tells [`Model::dt`](crate::Model::dt) how a symbol changes with time, and what tells
//! an [`AtomTable`](crate::AtomTable) whether an atom is constant.

use crate::error::{model::DuplicateName, Error};
use mech_algebra::Expr;
use std::{collections::HashMap, sync::Arc};

/// The role of a registered symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// The time symbol, `t`.
    Time,

    /// A generalized coordinate.
    Coordinate,

    /// The time derivative of a generalized coordinate.
    Velocity,

    /// The second time derivative of a generalized coordinate.
    Acceleration,

    /// An auxiliary coordinate, differentiated like a coordinate but kept out of the generalized
    /// coordinate list.
    AuxCoordinate,

    /// The time derivative of an auxiliary coordinate.
    AuxVelocity,

    /// The second time derivative of an auxiliary coordinate.
    AuxAcceleration,

    /// A constant parameter, such as a length or a mass.
    Parameter,

    /// A time-varying input, such as a motor torque.
    Input,

    /// An unknown of the joint equations, such as a reaction force.
    JointUnknown,
}

impl SymbolKind {
    /// Returns true if symbols of this kind change over time.
    pub fn is_time_varying(self) -> bool {
        !matches!(self, SymbolKind::Parameter | SymbolKind::JointUnknown)
    }
}

/// A coordinate together with its first and second time derivatives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// The coordinate itself.
    pub position: Arc<str>,

    /// Its time derivative.
    pub velocity: Arc<str>,

    /// Its second time derivative.
    pub acceleration: Arc<str>,
}

impl Coordinate {
    /// The coordinate as an expression.
    pub fn q(&self) -> Expr {
        Expr::symbol(self.position.clone())
    }

    /// The velocity as an expression.
    pub fn dq(&self) -> Expr {
        Expr::symbol(self.velocity.clone())
    }

    /// The acceleration as an expression.
    pub fn ddq(&self) -> Expr {
        Expr::symbol(self.acceleration.clone())
    }
}

/// The symbols registered in a model.
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    kinds: HashMap<Arc<str>, SymbolKind>,
    time: Arc<str>,
    coordinates: Vec<Coordinate>,
    aux_coordinates: Vec<Coordinate>,
    parameters: Vec<Arc<str>>,
    inputs: Vec<Arc<str>>,
    joint_unknowns: Vec<Arc<str>>,
}

impl SymbolRegistry {
    /// Creates a registry containing only the time symbol.
    pub fn new(time: &str) -> Self {
        let time: Arc<str> = Arc::from(time);
        Self {
            kinds: HashMap::from([(time.clone(), SymbolKind::Time)]),
            time,
            coordinates: Vec::new(),
            aux_coordinates: Vec::new(),
            parameters: Vec::new(),
            inputs: Vec::new(),
            joint_unknowns: Vec::new(),
        }
    }

    /// Creates a registry containing the time symbol and the parameter `gravity`, returning the
    /// parameter too. The two names must differ.
    pub(crate) fn with_gravity(time: &str, gravity: &str) -> (Self, Expr) {
        debug_assert_ne!(time, gravity);
        let mut registry = Self::new(time);
        let gravity = Arc::<str>::from(gravity);
        registry.kinds.insert(gravity.clone(), SymbolKind::Parameter);
        registry.parameters.push(gravity.clone());
        (registry, Expr::symbol(gravity))
    }

    fn check_free(&self, names: &[&str]) -> Result<(), Error> {
        for (i, name) in names.iter().enumerate() {
            if self.kinds.contains_key(*name) || names[..i].contains(name) {
                return Err(DuplicateName { kind: "symbol", name: name.to_string() }.into());
            }
        }
        Ok(())
    }

    fn register_triple(&mut self, names: [&str; 3], kinds: [SymbolKind; 3]) -> Result<Coordinate, Error> {
        self.check_free(&names)?;
        let [position, velocity, acceleration] = names.map(Arc::<str>::from);
        self.kinds.insert(position.clone(), kinds[0]);
        self.kinds.insert(velocity.clone(), kinds[1]);
        self.kinds.insert(acceleration.clone(), kinds[2]);
        Ok(Coordinate { position, velocity, acceleration })
    }

    fn register_single(&mut self, name: &str, kind: SymbolKind) -> Result<Expr, Error> {
        self.check_free(&[name])?;
        let name = Arc::<str>::from(name);
        self.kinds.insert(name.clone(), kind);
        match kind {
            SymbolKind::Parameter => self.parameters.push(name.clone()),
            SymbolKind::Input => self.inputs.push(name.clone()),
            _ => self.joint_unknowns.push(name.clone()),
        }
        Ok(Expr::symbol(name))
    }

    /// Registers the coordinate `name` with its velocity `d<name>` and acceleration `dd<name>`.
    pub fn new_coordinate(&mut self, name: &str) -> Result<Coordinate, Error> {
        self.new_coordinate_with(name, &format!("d{}", name), &format!("dd{}", name))
    }

    /// Registers a coordinate with explicitly named derivatives.
    pub fn new_coordinate_with(&mut self, q: &str, dq: &str, ddq: &str) -> Result<Coordinate, Error> {
        let coordinate = self.register_triple(
            [q, dq, ddq],
            [SymbolKind::Coordinate, SymbolKind::Velocity, SymbolKind::Acceleration],
        )?;
        self.coordinates.push(coordinate.clone());
        Ok(coordinate)
    }

    /// Registers the auxiliary coordinate `name` with its derivatives `d<name>` and `dd<name>`.
    pub fn new_aux_coordinate(&mut self, name: &str) -> Result<Coordinate, Error> {
        let coordinate = self.register_triple(
            [name, &format!("d{}", name), &format!("dd{}", name)],
            [SymbolKind::AuxCoordinate, SymbolKind::AuxVelocity, SymbolKind::AuxAcceleration],
        )?;
        self.aux_coordinates.push(coordinate.clone());
        Ok(coordinate)
    }

    /// Registers a constant parameter.
    pub fn new_parameter(&mut self, name: &str) -> Result<Expr, Error> {
        self.register_single(name, SymbolKind::Parameter)
    }

    /// Registers a time-varying input.
    pub fn new_input(&mut self, name: &str) -> Result<Expr, Error> {
        self.register_single(name, SymbolKind::Input)
    }

    /// Registers a joint unknown.
    pub fn new_joint_unknown(&mut self, name: &str) -> Result<Expr, Error> {
        self.register_single(name, SymbolKind::JointUnknown)
    }

    /// The time symbol.
    pub fn time(&self) -> Expr {
        Expr::symbol(self.time.clone())
    }

    /// The name of the time symbol.
    pub fn time_name(&self) -> &str {
        &self.time
    }

    /// The kind of the symbol with the given name, if it is registered.
    pub fn kind_of(&self, name: &str) -> Option<SymbolKind> {
        self.kinds.get(name).copied()
    }

    /// Returns true if the symbol is registered and changes over time.
    pub fn is_time_varying(&self, name: &str) -> bool {
        self.kind_of(name).is_some_and(SymbolKind::is_time_varying)
    }

    /// The generalized coordinates, in registration order.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// The auxiliary coordinates, in registration order.
    pub fn aux_coordinates(&self) -> &[Coordinate] {
        &self.aux_coordinates
    }

    /// The names of every symbol of the given kind, in registration order.
    pub fn of_kind(&self, kind: SymbolKind) -> Vec<Arc<str>> {
        fn triple(list: &[Coordinate], pick: fn(&Coordinate) -> &Arc<str>) -> Vec<Arc<str>> {
            list.iter().map(|c| pick(c).clone()).collect()
        }

        match kind {
            SymbolKind::Time => vec![self.time.clone()],
            SymbolKind::Coordinate => triple(&self.coordinates, |c| &c.position),
            SymbolKind::Velocity => triple(&self.coordinates, |c| &c.velocity),
            SymbolKind::Acceleration => triple(&self.coordinates, |c| &c.acceleration),
            SymbolKind::AuxCoordinate => triple(&self.aux_coordinates, |c| &c.position),
            SymbolKind::AuxVelocity => triple(&self.aux_coordinates, |c| &c.velocity),
            SymbolKind::AuxAcceleration => triple(&self.aux_coordinates, |c| &c.acceleration),
            SymbolKind::Parameter => self.parameters.clone(),
            SymbolKind::Input => self.inputs.clone(),
            SymbolKind::JointUnknown => self.joint_unknowns.clone(),
        }
    }

    /// The names of every time-varying symbol.
    pub fn time_varying(&self) -> impl Iterator<Item = &Arc<str>> + '_ {
        self.kinds.iter()
            .filter(|(_, kind)| kind.is_time_varying())
            .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::error::model::DuplicateName;
    use super::*;

    #[test]
    fn coordinate_triples() {
        let mut symbols = SymbolRegistry::new("t");
        let theta = symbols.new_coordinate("theta").unwrap();
        assert_eq!(&*theta.velocity, "dtheta");
        assert_eq!(&*theta.acceleration, "ddtheta");
        assert_eq!(symbols.kind_of("dtheta"), Some(SymbolKind::Velocity));
        assert_eq!(symbols.of_kind(SymbolKind::Acceleration), vec![Arc::from("ddtheta")]);
        assert!(symbols.is_time_varying("theta"));
    }

    #[test]
    fn parameters_are_constant() {
        let mut symbols = SymbolRegistry::new("t");
        symbols.new_parameter("l").unwrap();
        symbols.new_joint_unknown("lambda").unwrap();
        symbols.new_input("tau").unwrap();
        assert!(!symbols.is_time_varying("l"));
        assert!(!symbols.is_time_varying("lambda"));
        assert!(symbols.is_time_varying("tau"));
        assert!(!symbols.is_time_varying("unregistered"));
    }

    #[test]
    fn duplicate_names() {
        let mut symbols = SymbolRegistry::new("t");
        symbols.new_parameter("dx").unwrap();
        let err = symbols.new_coordinate("x").unwrap_err();
        assert_eq!(
            err.downcast_ref::<DuplicateName>(),
            Some(&DuplicateName { kind: "symbol", name: "dx".to_string() }),
        );
        // nothing of the failed triple was registered
        assert_eq!(symbols.kind_of("x"), None);

        assert!(symbols.new_parameter("t").is_err());
        assert!(symbols.new_coordinate_with("a", "a", "b").is_err());
    }
}
