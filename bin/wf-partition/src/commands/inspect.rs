// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `wf-partition inspect` command: display workflow structure.

use std::path::PathBuf;
use workflow_planner::rear_job;

pub fn execute(workflow: PathBuf) -> anyhow::Result<()> {
    let wf = super::load_workflow(&workflow)?;
    let graph = wf.to_graph()?;

    super::banner("Workflow Inspector");

    // ── Summary ────────────────────────────────────────────────
    let ids = |nodes: Vec<&workflow_graph::Node<usize>>| {
        nodes.iter().map(|n| n.id()).collect::<Vec<_>>().join(", ")
    };
    println!("  Workflow: {}", wf.name);
    println!("  Jobs:     {}", graph.len());
    println!("  Edges:    {}", graph.edge_count());
    println!("  Roots:    {}", ids(graph.roots()));
    println!("  Leaves:   {}", ids(graph.leaves()));
    println!("  Rear job: {}", rear_job(&graph).unwrap_or("-"));
    match graph.find_cycle() {
        Some((parent, child)) => println!("  Cycle:    {parent} -> {child}"),
        None => println!("  Cycle:    none"),
    }
    println!();

    // ── Per-Job Detail ─────────────────────────────────────────
    println!(
        "  {:<30} {:<18} {:>4} {:>4} {:>10}",
        "Job", "Transformation", "In", "Out", "Staged",
    );
    println!("  {}", "-".repeat(70));

    for node in graph.nodes() {
        let staged: f64 = wf
            .job(*node.content())
            .map(|job| job.staged_files().map(|f| f.size).sum())
            .unwrap_or(0.0);
        let transformation = wf
            .job(*node.content())
            .map_or("", |job| job.transformation.as_str());
        println!(
            "  {:<30} {:<18} {:>4} {:>4} {:>10.2}",
            truncate(node.id(), 30),
            truncate(transformation, 18),
            node.in_degree(),
            node.out_degree(),
            staged,
        );
    }
    println!();
    Ok(())
}

/// Truncates a string to `max_len` characters with ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}
