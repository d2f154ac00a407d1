//! Per-timestep LP: bounded arc flows, slack terms, and mass balance.

use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};

use crate::network::{Network, NodeKind};

use super::{LpOptions, SolveError};

/// Solved per-timestep program.
#[derive(Debug, Clone)]
pub struct LpOutcome {
    /// Flow per arc (Ml), indexed like `Network::arcs()`.
    pub flows: Vec<f64>,
    /// Objective contribution of arc flows only (slack penalties excluded).
    pub flow_cost: f64,
    /// Unserved demand per node (Ml), indexed like `Network::nodes()`;
    /// zero everywhere except `Demand` nodes.
    pub shortfall_ml: Vec<f64>,
    /// Unrouted surplus per node (Ml), zero everywhere except `Source` nodes.
    pub spill_ml: Vec<f64>,
}

impl LpOutcome {
    pub fn total_shortfall_ml(&self) -> f64 {
        self.shortfall_ml.iter().sum()
    }

    pub fn total_spill_ml(&self) -> f64 {
        self.spill_ml.iter().sum()
    }
}

/// Formulates and solves the min-cost flow program for one timestep.
///
/// `supply` and `demand` are per-node injections (Ml), indexed like
/// `Network::nodes()`. One flow variable per arc bounded by
/// `[lower_ml, upper_ml]`, mass balance at every node, and a linear cost
/// objective. Imbalance is absorbed by slack variables priced through
/// `options`: shortfall at `Demand` nodes, spill at `Source` nodes.
///
/// # Errors
///
/// Returns a `SolveError` when the injection slices do not match the node
/// count or the solver reports infeasibility, unboundedness, or failure.
pub fn solve_step(
    network: &Network,
    supply: &[f64],
    demand: &[f64],
    options: &LpOptions,
) -> Result<LpOutcome, SolveError> {
    let n_nodes = network.node_count();
    if supply.len() != n_nodes || demand.len() != n_nodes {
        return Err(SolveError::Solver(format!(
            "injection length mismatch: {} nodes, {} supply, {} demand",
            n_nodes,
            supply.len(),
            demand.len()
        )));
    }

    let mut vars = ProblemVariables::new();

    // Flow variables carry the arc bounds directly.
    let flow: Vec<Variable> = network
        .arcs()
        .iter()
        .map(|arc| {
            let mut def = variable().min(arc.lower_ml);
            if arc.upper_ml.is_finite() {
                def = def.max(arc.upper_ml);
            }
            vars.add(def)
        })
        .collect();

    // Slack: shortfall acts as extra supply at demand nodes, spill as extra
    // demand at source nodes.
    let shortfall: Vec<Option<Variable>> = network
        .nodes()
        .iter()
        .map(|node| (node.kind == NodeKind::Demand).then(|| vars.add(variable().min(0.0))))
        .collect();
    let spill: Vec<Option<Variable>> = network
        .nodes()
        .iter()
        .map(|node| (node.kind == NodeKind::Source).then(|| vars.add(variable().min(0.0))))
        .collect();

    let arc_cost: Expression = network
        .arcs()
        .iter()
        .zip(&flow)
        .map(|(arc, &v)| v * arc.cost)
        .sum();
    let shortfall_cost: Expression = shortfall
        .iter()
        .flatten()
        .map(|&s| s * options.shortage_penalty)
        .sum();
    let spill_cost: Expression = spill
        .iter()
        .flatten()
        .map(|&s| s * options.spill_cost)
        .sum();
    let objective = arc_cost + shortfall_cost + spill_cost;

    let mut model = vars.minimise(objective).using(microlp);

    // Mass balance: supply + inflow + shortfall == demand + outflow + spill.
    for n in 0..n_nodes {
        let inflow: Expression = network
            .arcs_in(n)
            .iter()
            .map(|&a| Expression::from(flow[a]))
            .sum();
        let outflow: Expression = network
            .arcs_out(n)
            .iter()
            .map(|&a| Expression::from(flow[a]))
            .sum();
        let mut lhs = inflow - outflow;
        if let Some(s) = shortfall[n] {
            lhs = lhs + Expression::from(s);
        }
        if let Some(s) = spill[n] {
            lhs = lhs - Expression::from(s);
        }
        let rhs = demand[n] - supply[n];
        model = model.with(constraint!(lhs == rhs));
    }

    let solution = model.solve().map_err(|e| match e {
        ResolutionError::Infeasible => SolveError::Infeasible,
        ResolutionError::Unbounded => SolveError::Unbounded,
        other => SolveError::Solver(other.to_string()),
    })?;

    let flows: Vec<f64> = flow.iter().map(|&v| solution.value(v)).collect();
    let flow_cost = network
        .arcs()
        .iter()
        .zip(&flows)
        .map(|(arc, f)| arc.cost * f)
        .sum();
    let slack_value = |v: &Option<Variable>| v.map_or(0.0, |s| solution.value(s).max(0.0));
    let shortfall_ml: Vec<f64> = shortfall.iter().map(slack_value).collect();
    let spill_ml: Vec<f64> = spill.iter().map(slack_value).collect();

    Ok(LpOutcome {
        flows,
        flow_cost,
        shortfall_ml,
        spill_ml,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Arc, Network, Node, NodeKind};

    const EPS: f64 = 1e-6;

    fn net(nodes: Vec<Node>, arcs: Vec<Arc>) -> Network {
        Network::new(nodes, arcs).expect("test network should be valid")
    }

    fn injections(network: &Network, entries: &[(&str, f64)]) -> Vec<f64> {
        let mut v = vec![0.0; network.node_count()];
        for (name, ml) in entries {
            let idx = network.node_index(name).expect("node exists");
            v[idx] = *ml;
        }
        v
    }

    #[test]
    fn single_arc_serves_demand() {
        let network = net(
            vec![
                Node::new("Res", NodeKind::Source),
                Node::new("Town", NodeKind::Demand),
            ],
            vec![Arc::capacitated("Res", "Town", 2.0, 10.0)],
        );
        let supply = injections(&network, &[("Res", 5.0)]);
        let demand = injections(&network, &[("Town", 5.0)]);

        let out = solve_step(&network, &supply, &demand, &LpOptions::default())
            .expect("balanced single-arc instance solves");
        assert!((out.flows[0] - 5.0).abs() < EPS);
        assert!((out.flow_cost - 10.0).abs() < EPS);
        assert!(out.total_shortfall_ml() < EPS);
        assert!(out.total_spill_ml() < EPS);
    }

    #[test]
    fn diamond_picks_cheap_path_first() {
        // S -> A -> T is cheap but capped at 4; remainder routes S -> B -> T.
        let network = net(
            vec![
                Node::new("S", NodeKind::Source),
                Node::new("A", NodeKind::Junction),
                Node::new("B", NodeKind::Junction),
                Node::new("T", NodeKind::Demand),
            ],
            vec![
                Arc::capacitated("S", "A", 1.0, 4.0),
                Arc::capacitated("S", "B", 3.0, 10.0),
                Arc::capacitated("A", "T", 1.0, 4.0),
                Arc::capacitated("B", "T", 1.0, 10.0),
            ],
        );
        let supply = injections(&network, &[("S", 6.0)]);
        let demand = injections(&network, &[("T", 6.0)]);

        let out = solve_step(&network, &supply, &demand, &LpOptions::default())
            .expect("diamond instance solves");
        // 4 Ml over the cheap path (cost 2/Ml) + 2 Ml over the dear path (cost 4/Ml)
        assert!((out.flow_cost - 16.0).abs() < EPS, "cost {}", out.flow_cost);
        assert!((out.flows[0] - 4.0).abs() < EPS);
        assert!((out.flows[1] - 2.0).abs() < EPS);
    }

    #[test]
    fn capacity_shortage_lands_in_shortfall() {
        let network = net(
            vec![
                Node::new("Res", NodeKind::Source),
                Node::new("Town", NodeKind::Demand),
            ],
            vec![Arc::capacitated("Res", "Town", 1.0, 3.0)],
        );
        let supply = injections(&network, &[("Res", 5.0)]);
        let demand = injections(&network, &[("Town", 5.0)]);

        let out = solve_step(&network, &supply, &demand, &LpOptions::default())
            .expect("shortage instance still solves");
        assert!((out.flows[0] - 3.0).abs() < EPS);
        assert!((out.total_shortfall_ml() - 2.0).abs() < EPS);
        // the 2 Ml stranded at the source spills
        assert!((out.total_spill_ml() - 2.0).abs() < EPS);
        assert!((out.flow_cost - 3.0).abs() < EPS);
    }

    #[test]
    fn surplus_supply_spills_at_source() {
        let network = net(
            vec![
                Node::new("Res", NodeKind::Source),
                Node::new("Town", NodeKind::Demand),
            ],
            vec![Arc::capacitated("Res", "Town", 1.0, 10.0)],
        );
        let supply = injections(&network, &[("Res", 8.0)]);
        let demand = injections(&network, &[("Town", 5.0)]);

        let out = solve_step(&network, &supply, &demand, &LpOptions::default())
            .expect("surplus instance solves");
        assert!((out.flows[0] - 5.0).abs() < EPS);
        assert!((out.total_spill_ml() - 3.0).abs() < EPS);
        assert!(out.total_shortfall_ml() < EPS);
    }

    #[test]
    fn arc_lower_bound_forces_dear_route() {
        // Compulsory 1 Ml release over the weir route even though the direct
        // main is cheaper for every Ml.
        let network = net(
            vec![
                Node::new("Res", NodeKind::Source),
                Node::new("Weir", NodeKind::Junction),
                Node::new("Town", NodeKind::Demand),
            ],
            vec![
                Arc::new("Res", "Weir", 4.0, 1.0, 10.0),
                Arc::capacitated("Weir", "Town", 0.0, 10.0),
                Arc::capacitated("Res", "Town", 1.0, 10.0),
            ],
        );
        let supply = injections(&network, &[("Res", 5.0)]);
        let demand = injections(&network, &[("Town", 5.0)]);

        let out = solve_step(&network, &supply, &demand, &LpOptions::default())
            .expect("lower-bound instance solves");
        assert!((out.flows[0] - 1.0).abs() < EPS, "weir release {}", out.flows[0]);
        assert!((out.flows[2] - 4.0).abs() < EPS, "direct main {}", out.flows[2]);
        assert!((out.flow_cost - 8.0).abs() < EPS);
        assert!(out.total_shortfall_ml() < EPS);
    }

    #[test]
    fn unmeetable_lower_bound_is_infeasible() {
        // The arc must carry >= 5 Ml into a node that only demands 2 and has
        // no outlet, so no balance exists.
        let network = net(
            vec![
                Node::new("Res", NodeKind::Source),
                Node::new("Town", NodeKind::Demand),
            ],
            vec![Arc::new("Res", "Town", 1.0, 5.0, 10.0)],
        );
        let supply = injections(&network, &[("Res", 5.0)]);
        let demand = injections(&network, &[("Town", 2.0)]);

        let err = solve_step(&network, &supply, &demand, &LpOptions::default()).unwrap_err();
        assert_eq!(err, SolveError::Infeasible);
    }

    #[test]
    fn negative_cycle_on_uncapacitated_arcs_is_unbounded() {
        let network = net(
            vec![
                Node::new("A", NodeKind::Junction),
                Node::new("B", NodeKind::Junction),
            ],
            vec![
                Arc::new("A", "B", -1.0, 0.0, f64::INFINITY),
                Arc::new("B", "A", -1.0, 0.0, f64::INFINITY),
            ],
        );
        let supply = vec![0.0, 0.0];
        let demand = vec![0.0, 0.0];

        let err = solve_step(&network, &supply, &demand, &LpOptions::default()).unwrap_err();
        assert_eq!(err, SolveError::Unbounded);
    }

    #[test]
    fn conservation_holds_at_every_node() {
        let network = net(
            vec![
                Node::new("S", NodeKind::Source),
                Node::new("J", NodeKind::Junction),
                Node::new("T", NodeKind::Demand),
            ],
            vec![
                Arc::capacitated("S", "J", 1.0, 10.0),
                Arc::capacitated("J", "T", 1.0, 10.0),
            ],
        );
        let supply = injections(&network, &[("S", 4.0)]);
        let demand = injections(&network, &[("T", 4.0)]);

        let out = solve_step(&network, &supply, &demand, &LpOptions::default())
            .expect("chain instance solves");
        for n in 0..network.node_count() {
            let inflow: f64 = network.arcs_in(n).iter().map(|&a| out.flows[a]).sum();
            let outflow: f64 = network.arcs_out(n).iter().map(|&a| out.flows[a]).sum();
            let balance =
                supply[n] + inflow + out.shortfall_ml[n] - demand[n] - outflow - out.spill_ml[n];
            assert!(balance.abs() < EPS, "node {n} unbalanced by {balance}");
        }
    }

    #[test]
    fn injection_length_mismatch_is_reported() {
        let network = net(
            vec![Node::new("A", NodeKind::Source)],
            vec![],
        );
        let err = solve_step(&network, &[1.0, 2.0], &[0.0], &LpOptions::default()).unwrap_err();
        assert!(matches!(err, SolveError::Solver(_)));
    }
}
