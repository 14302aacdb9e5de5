//! Parameter set for simultaneous fits
//!
//! A [`ParameterSet`] holds one group of parameters per dataset, each group
//! laid out in the role order of the line-shape model being fitted. Parameters
//! are addressed by [`ParamKey`] rather than by formatted names. Tying a role
//! across datasets is done by linking: the linked parameter stops being a free
//! variable and mirrors the value of its target.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::parameters::parameter::{ParamKey, Parameter, ParameterError};

/// Parameters for `n_datasets` groups of `n_roles` parameters each
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    n_roles: usize,
    n_datasets: usize,
    /// Dataset-major storage: group `i` occupies `i * n_roles .. (i + 1) * n_roles`
    params: Vec<Parameter>,
}

impl ParameterSet {
    /// Create an empty set whose groups will hold `n_roles` parameters
    pub fn new(n_roles: usize) -> Self {
        Self {
            n_roles,
            n_datasets: 0,
            params: Vec::new(),
        }
    }

    /// Append the parameter group of the next dataset, returning its index
    pub fn push_group(&mut self, group: Vec<Parameter>) -> Result<usize, ParameterError> {
        if group.len() != self.n_roles {
            return Err(ParameterError::InternalLength {
                expected: self.n_roles,
                actual: group.len(),
            });
        }

        self.params.extend(group);
        self.n_datasets += 1;
        Ok(self.n_datasets - 1)
    }

    pub fn n_roles(&self) -> usize {
        self.n_roles
    }

    pub fn n_datasets(&self) -> usize {
        self.n_datasets
    }

    /// Total number of parameters, free or not
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn index(&self, key: ParamKey) -> Result<usize, ParameterError> {
        if key.role < self.n_roles && key.dataset < self.n_datasets {
            Ok(key.dataset * self.n_roles + key.role)
        } else {
            Err(ParameterError::ParameterNotFound { key })
        }
    }

    pub fn get(&self, key: ParamKey) -> Option<&Parameter> {
        self.index(key).ok().map(|idx| &self.params[idx])
    }

    pub fn get_mut(&mut self, key: ParamKey) -> Option<&mut Parameter> {
        match self.index(key) {
            Ok(idx) => Some(&mut self.params[idx]),
            Err(_) => None,
        }
    }

    pub fn value(&self, key: ParamKey) -> Result<f64, ParameterError> {
        Ok(self.params[self.index(key)?].value())
    }

    /// Parameters of one dataset, in role order
    pub fn group(&self, dataset: usize) -> Option<&[Parameter]> {
        (dataset < self.n_datasets)
            .then(|| &self.params[dataset * self.n_roles..(dataset + 1) * self.n_roles])
    }

    /// Current values of one dataset's parameters, in role order
    pub fn group_values(&self, dataset: usize) -> Option<Vec<f64>> {
        self.group(dataset)
            .map(|group| group.iter().map(Parameter::value).collect())
    }

    /// Make `key` mirror the value of `target`
    ///
    /// Links are one level deep: the target must own its value, and a
    /// parameter that others already mirror cannot itself be linked.
    pub fn link(&mut self, key: ParamKey, target: ParamKey) -> Result<(), ParameterError> {
        if key == target {
            return Err(ParameterError::SelfLink { key });
        }

        let key_idx = self.index(key)?;
        let target_idx = self.index(target)?;

        if self.params[target_idx].link().is_some() {
            return Err(ParameterError::ChainedLink { key, target });
        }
        if self.params.iter().any(|p| p.link() == Some(key)) {
            return Err(ParameterError::ChainedLink { key, target });
        }

        let value = self.params[target_idx].value();
        let param = &mut self.params[key_idx];
        param.set_link(Some(target));
        param.mirror(value);
        Ok(())
    }

    /// Tie `role` in every dataset after the first to the first dataset's value
    pub fn tie_role(&mut self, role: usize) -> Result<(), ParameterError> {
        let target = ParamKey::new(role, 0);
        for dataset in 1..self.n_datasets {
            self.link(ParamKey::new(role, dataset), target)?;
        }
        Ok(())
    }

    /// Hold `role` at its current value in every dataset
    pub fn fix_role(&mut self, role: usize) -> Result<(), ParameterError> {
        for dataset in 0..self.n_datasets {
            let idx = self.index(ParamKey::new(role, dataset))?;
            self.params[idx].set_vary(false);
        }
        Ok(())
    }

    /// Keys of the parameters the optimizer varies, in (dataset, role) order
    pub fn free_keys(&self) -> Vec<ParamKey> {
        self.params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_free())
            .map(|(idx, _)| ParamKey::new(idx % self.n_roles, idx / self.n_roles))
            .collect()
    }

    /// Number of free parameters
    pub fn n_free(&self) -> usize {
        self.params.iter().filter(|p| p.is_free()).count()
    }

    /// Free parameter values in the optimizer's unbounded coordinates
    pub fn to_internal(&self) -> Result<Array1<f64>, ParameterError> {
        self.params
            .iter()
            .filter(|p| p.is_free())
            .map(Parameter::to_internal)
            .collect::<Result<Vec<_>, _>>()
            .map(Array1::from_vec)
    }

    /// Write optimizer coordinates back to the free parameters, then refresh
    /// every linked parameter from its target
    pub fn update_from_internal(&mut self, values: &[f64]) -> Result<(), ParameterError> {
        let expected = self.n_free();
        if values.len() != expected {
            return Err(ParameterError::InternalLength {
                expected,
                actual: values.len(),
            });
        }

        let mut values = values.iter();
        for param in self.params.iter_mut().filter(|p| p.is_free()) {
            if let Some(&v) = values.next() {
                param.set_from_internal(v);
            }
        }

        self.resolve_links();
        Ok(())
    }

    /// Copy each link target's value into the parameters that mirror it
    pub fn resolve_links(&mut self) {
        for idx in 0..self.params.len() {
            if let Some(target) = self.params[idx].link() {
                let target_idx = target.dataset * self.n_roles + target.role;
                let value = self.params[target_idx].value();
                self.params[idx].mirror(value);
            }
        }
    }

    /// Serialize the set to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a set from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let set: Self = serde_json::from_str(json)?;
        if set.params.len() != set.n_roles * set.n_datasets {
            return Err(serde::de::Error::custom(format!(
                "expected {} parameters for {} groups of {}, found {}",
                set.n_roles * set.n_datasets,
                set.n_datasets,
                set.n_roles,
                set.params.len()
            )));
        }
        Ok(set)
    }
}
