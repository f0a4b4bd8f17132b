// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `wf-partition levels` command: level-order listing of a workflow.

use std::collections::BTreeMap;
use std::path::PathBuf;

pub fn execute(workflow: PathBuf, bottom_up: bool) -> anyhow::Result<()> {
    let wf = super::load_workflow(&workflow)?;
    let graph = wf.to_graph()?;

    if bottom_up {
        super::banner("Levels (bottom-up)");
        let mut walk = graph.bottom_up();
        let mut levels: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        while let Some(node) = walk.next() {
            let depth = walk.depth(node.id()).unwrap_or(0);
            levels.entry(depth).or_default().push(node.id().to_string());
        }
        for (depth, jobs) in &levels {
            println!("  {depth:>3}: {}", jobs.join(", "));
        }
    } else {
        super::banner("Levels");
        for (depth, jobs) in graph.levels().iter().enumerate() {
            println!("  {depth:>3}: {}", jobs.join(", "));
        }
    }

    println!();
    Ok(())
}
