//! Default stub contents
//!
//! Stubs are Handlebars templates. A backslash directly in front of `{{`
//! escapes the expression, so namespaced names are always passed in whole
//! rather than assembled in the template.

/// Repository contract
pub const REPOSITORY_INTERFACE: &str = r"<?php

namespace {{namespace}};

interface {{interface_name}}
{
    /**
     * Get all records.
     *
     * @param array $columns
     * @return \Illuminate\Database\Eloquent\Collection
     */
    public function all($columns = ['*']);

    /**
     * Find a record by its primary key.
     *
     * @param mixed $id
     * @param array $columns
     * @return \Illuminate\Database\Eloquent\Model|null
     */
    public function find($id, $columns = ['*']);

    /**
     * Create a record.
     *
     * @param array $attributes
     * @return \Illuminate\Database\Eloquent\Model
     */
    public function create(array $attributes);

    /**
     * Update a record.
     *
     * @param mixed $id
     * @param array $attributes
     * @return \Illuminate\Database\Eloquent\Model|false
     */
    public function update($id, array $attributes);

    /**
     * Delete a record.
     *
     * @param mixed $id
     * @return bool
     */
    public function delete($id);
}
";

/// Eloquent repository implementation
pub const REPOSITORY_CLASS: &str = r"<?php

namespace {{namespace}};

use {{base_namespace}}\BaseRepository;
{{#if model}}
use {{model.fqcn}};
{{/if}}

class {{class_name}} extends BaseRepository implements {{interface_name}}
{
    /**
     * Eloquent model backing this repository.
     *
     * @return string
     */
    public function getModel()
    {
{{#if model}}
        return {{model.name}}::class;
{{else}}
        throw new \LogicException('{{class_name}} is not bound to a model yet.');
{{/if}}
    }
}
";

/// Internal service contract
pub const SERVICE_INTERFACE: &str = r"<?php

namespace {{namespace}};

interface {{interface_name}}
{
    //
}
";

/// Internal service implementation
pub const SERVICE_CLASS: &str = r"<?php

namespace {{namespace}};

use {{base_namespace}}\BaseInternalService;
use {{repository_interface_fqcn}};

class {{class_name}} extends BaseInternalService implements {{interface_name}}
{
    /**
     * @var {{repository_interface}}
     */
    protected ${{camel_name}}Repository;

    /**
     * @param {{repository_interface}} ${{camel_name}}Repository
     */
    public function __construct({{repository_interface}} ${{camel_name}}Repository)
    {
        $this->{{camel_name}}Repository = ${{camel_name}}Repository;
    }
}
";

/// Provider binding repository contracts
pub const REPOSITORY_PROVIDER: &str = r"<?php

namespace {{namespace}};

use Illuminate\Support\ServiceProvider;
#pattern:interface-use
#pattern:class-use

class RepositoryServiceProvider extends ServiceProvider
{
    /**
     * Indicates if loading of the provider is deferred.
     *
     * @var bool
     */
    protected $defer = true;

    /**
     * Register repository bindings.
     *
     * @return void
     */
    public function register()
    {
        #pattern:bindings
    }

    /**
     * Get the services provided by the provider.
     *
     * @return array
     */
    public function provides()
    {
        return [
            #pattern:provides
        ];
    }
}
";

/// Provider binding internal service contracts
pub const INTERNAL_PROVIDER: &str = r"<?php

namespace {{namespace}};

use Illuminate\Support\ServiceProvider;
#pattern:interface-use
#pattern:class-use

class InternalServiceProvider extends ServiceProvider
{
    /**
     * Indicates if loading of the provider is deferred.
     *
     * @var bool
     */
    protected $defer = true;

    /**
     * Register internal service bindings.
     *
     * @return void
     */
    public function register()
    {
        #pattern:bindings
    }

    /**
     * Get the services provided by the provider.
     *
     * @return array
     */
    public function provides()
    {
        return [
            #pattern:provides
        ];
    }
}
";

/// Shared repository base class
pub const BASE_REPOSITORY: &str = r"<?php

namespace {{namespace}};

use Illuminate\Database\Eloquent\Model;

abstract class BaseRepository
{
    /**
     * @var Model
     */
    protected $model;

    public function __construct()
    {
        $this->setModel();
    }

    /**
     * Class name of the Eloquent model.
     *
     * @return string
     */
    abstract public function getModel();

    /**
     * Resolve the model from the container.
     *
     * @return void
     */
    public function setModel()
    {
        $this->model = app()->make($this->getModel());
    }

    public function all($columns = ['*'])
    {
        return $this->model->all($columns);
    }

    public function find($id, $columns = ['*'])
    {
        return $this->model->find($id, $columns);
    }

    public function create(array $attributes)
    {
        return $this->model->create($attributes);
    }

    public function update($id, array $attributes)
    {
        $record = $this->find($id);

        if (! $record) {
            return false;
        }

        $record->update($attributes);

        return $record;
    }

    public function delete($id)
    {
        $record = $this->find($id);

        return $record ? (bool) $record->delete() : false;
    }
}
";

/// Shared internal service base class
pub const BASE_INTERNAL_SERVICE: &str = r"<?php

namespace {{namespace}};

abstract class BaseInternalService
{
    //
}
";

/// Eloquent model
pub const MODEL: &str = r"<?php

namespace {{namespace}};

use Illuminate\Database\Eloquent\Model;

class {{class_name}} extends Model
{
    /**
     * The table associated with the model.
     *
     * @var string
     */
    protected $table = '{{table}}';

    /**
     * The attributes that are mass assignable.
     *
     * @var array
     */
    protected $fillable = [
{{#each fillable}}
        '{{this}}'{{#unless @last}},{{/unless}}
{{/each}}
    ];
}
";
